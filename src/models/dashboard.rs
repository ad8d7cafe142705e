// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::orders::CanonicalOrder;

// 1. Resumo do Dia (os cards do topo)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub total_sales: Decimal,
    #[schema(example = 12)]
    pub total_customers: i64,
    #[schema(example = 30)]
    pub total_orders: i64,
    pub avg_sale: Decimal,
}

// 2. Série global de vendas: uma linha por dia, ordenada por data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesPoint {
    // Chave de calendário no formato YYYY-MM-DD
    #[schema(example = "2026-08-03")]
    pub date: String,
    pub total: Decimal,
}

// 3. Ponto da janela semanal (Segunda -> Domingo)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekPoint {
    #[schema(example = "Monday, Aug 3")]
    pub label: String,
    pub total: Decimal,
}

// 4. Ranking de produtos por unidades vendidas
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopularProduct {
    pub id: Uuid,
    #[schema(example = "Café Gelado")]
    pub name: String,
    pub price: Decimal,
    #[schema(example = 42)]
    pub sold: i64,
}

// O payload agregado que a apresentação consome num único GET.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub weekly_sales: Vec<SalesPoint>,
    pub summary: TodaySummary,
    pub recent_orders: Vec<CanonicalOrder>,
    pub popular_products: Vec<PopularProduct>,
}
