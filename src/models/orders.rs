// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Linhas cruas das fontes de armazenamento ---

// Registro por transação (tabela order_records): a fonte com o agrupamento
// correto em nível de transação. O `items` chega como JSONB e só é
// interpretado pelo normalizador.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRecordRow {
    pub id: Uuid,
    pub items: Option<serde_json::Value>,
    pub total: Option<Decimal>,
    pub payment_method: Option<String>,
    pub customer_id: Option<String>,
    pub store_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Registro do log legado (tabela orders): UMA linha por item vendido,
// não por transação. Usado apenas como fallback do resumo do dia.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyOrderRow {
    pub id: Uuid,
    pub price: Option<Decimal>,
    pub qty: Option<i64>,
    pub customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Um item dentro do JSONB `items` de order_records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    #[serde(default)]
    pub qty: i64,
}

// --- Pedido canônico ---

// A forma normalizada sobre a qual toda agregação e exibição opera.
// É um snapshot imutável: nenhum consumidor recalcula `total_amount`
// a partir dos itens.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalOrder {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    // Nome do item quando o pedido tem exatamente um, senão "<N> items".
    #[schema(example = "2 items")]
    pub items_summary: String,

    // Soma das quantidades de todos os itens.
    #[schema(example = 5)]
    pub quantity: i64,

    // Valor autoritativo da transação.
    pub total_amount: Decimal,

    #[schema(example = "CASH")]
    pub payment_method: String,

    pub created_at: DateTime<Utc>,

    // Ausente = cliente anônimo; não conta como cliente distinto.
    pub customer_id: Option<String>,

    pub store_id: Option<String>,
}
