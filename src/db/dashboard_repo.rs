// src/db/dashboard_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{PopularProduct, SalesPoint},
        orders::{LegacyOrderRow, OrderRecordRow},
    },
};

// Acesso de leitura às quatro fontes de armazenamento do dashboard.
// Nenhuma escrita acontece aqui: toda agregação é uma leitura seguida
// de redução em memória.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Série pré-agregada de vendas.
    // O agrupamento garante uma linha por chave de dia mesmo que a tabela
    // tenha mais de uma linha para a mesma data.
    pub async fn aggregated_sales_series(&self) -> Result<Vec<SalesPoint>, AppError> {
        let data = sqlx::query_as::<_, SalesPoint>(
            r#"
            SELECT
                to_char(date, 'YYYY-MM-DD') as "date",
                COALESCE(SUM(amount), 0) as "total"
            FROM sales
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(data)
    }

    // 2. Fallback da série: agrupa os registros por transação por dia de
    // calendário e soma o total de cada dia.
    pub async fn order_records_series(&self) -> Result<Vec<SalesPoint>, AppError> {
        let data = sqlx::query_as::<_, SalesPoint>(
            r#"
            SELECT
                to_char(created_at, 'YYYY-MM-DD') as "date",
                COALESCE(SUM(total), 0) as "total"
            FROM order_records
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(data)
    }

    // 3. Registros por transação a partir de um instante de corte.
    pub async fn order_records_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<OrderRecordRow>, AppError> {
        let rows = sqlx::query_as::<_, OrderRecordRow>(
            r#"
            SELECT id, items, total, payment_method, customer_id, store_id, created_at
            FROM order_records
            WHERE created_at >= $1
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // 4. Linhas do log legado a partir de um instante de corte.
    pub async fn legacy_orders_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<LegacyOrderRow>, AppError> {
        let rows = sqlx::query_as::<_, LegacyOrderRow>(
            r#"
            SELECT id, price, qty, customer_id, created_at
            FROM orders
            WHERE created_at >= $1
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // 5. Pedidos mais recentes, com filtro opcional de loja.
    pub async fn recent_order_records(
        &self,
        store_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<OrderRecordRow>, AppError> {
        let rows = sqlx::query_as::<_, OrderRecordRow>(
            r#"
            SELECT id, items, total, payment_method, customer_id, store_id, created_at
            FROM order_records
            WHERE ($1::text IS NULL OR store_id = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(store_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // 6. Ranking de produtos por unidades vendidas.
    pub async fn popular_products(&self, limit: i64) -> Result<Vec<PopularProduct>, AppError> {
        let data = sqlx::query_as::<_, PopularProduct>(
            r#"
            SELECT id, name, price, sold
            FROM products
            ORDER BY sold DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(data)
    }
}
