// src/services/sources.rs
//
// A regra de precedência de fontes como uma lista ordenada de estratégias.
// Cada fonte devolve linhas populadas, um conjunto vazio ou uma falha; o
// resolvedor percorre a lista em ordem e devolve o PRIMEIRO resultado
// populado. Falha vale o mesmo que vazio: é logada e a próxima fonte é
// consultada, nunca o chamador. As fontes jamais são mescladas entre si —
// isso evita contar a mesma transação lógica duas vezes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{dashboard::SalesPoint, orders::CanonicalOrder},
    services::normalizer,
};

// --- Série global de vendas ---

#[async_trait]
pub trait SeriesSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self) -> Result<Vec<SalesPoint>, AppError>;
}

pub async fn resolve_series(sources: &[Arc<dyn SeriesSource>]) -> Vec<SalesPoint> {
    for source in sources {
        match source.fetch().await {
            Ok(rows) if !rows.is_empty() => return rows,
            Ok(_) => {
                tracing::debug!(fonte = source.name(), "fonte sem linhas, tentando a próxima");
            }
            Err(e) => {
                tracing::warn!(
                    fonte = source.name(),
                    erro = %e,
                    "fonte indisponível, tentando a próxima"
                );
            }
        }
    }
    Vec::new()
}

// Fonte primária: a tabela de vendas pré-agregadas. Pode ainda não estar
// populada em todas as instalações, daí o fallback abaixo.
pub struct AggregatedSalesSource {
    repo: DashboardRepository,
}

impl AggregatedSalesSource {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SeriesSource for AggregatedSalesSource {
    fn name(&self) -> &'static str {
        "vendas_agregadas"
    }

    async fn fetch(&self) -> Result<Vec<SalesPoint>, AppError> {
        self.repo.aggregated_sales_series().await
    }
}

// Fallback: agrupa os registros por transação por dia de calendário.
pub struct OrderRecordSeriesSource {
    repo: DashboardRepository,
}

impl OrderRecordSeriesSource {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SeriesSource for OrderRecordSeriesSource {
    fn name(&self) -> &'static str {
        "registros_por_dia"
    }

    async fn fetch(&self) -> Result<Vec<SalesPoint>, AppError> {
        self.repo.order_records_series().await
    }
}

// --- Pedidos do dia (resumo de hoje) ---

#[async_trait]
pub trait OrdersSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_since(&self, cutoff: DateTime<Utc>)
        -> Result<Vec<CanonicalOrder>, AppError>;
}

// Tudo-ou-nada: a primeira fonte com >=1 registro é autoritativa e as
// seguintes nem são consultadas.
pub async fn resolve_orders(
    sources: &[Arc<dyn OrdersSource>],
    cutoff: DateTime<Utc>,
) -> Vec<CanonicalOrder> {
    for source in sources {
        match source.fetch_since(cutoff).await {
            Ok(rows) if !rows.is_empty() => return rows,
            Ok(_) => {
                tracing::debug!(fonte = source.name(), "fonte sem registros, tentando a próxima");
            }
            Err(e) => {
                tracing::warn!(
                    fonte = source.name(),
                    erro = %e,
                    "fonte indisponível, tentando a próxima"
                );
            }
        }
    }
    Vec::new()
}

// Fonte primária: registros por transação.
pub struct TransactionOrdersSource {
    repo: DashboardRepository,
}

impl TransactionOrdersSource {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl OrdersSource for TransactionOrdersSource {
    fn name(&self) -> &'static str {
        "registros_de_transacao"
    }

    async fn fetch_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<CanonicalOrder>, AppError> {
        let rows = self.repo.order_records_since(cutoff).await?;
        Ok(rows.iter().map(normalizer::from_order_record).collect())
    }
}

// Fallback: o log legado, onde cada linha de item conta como um pedido
// (aproximação herdada do formato, preservada deliberadamente).
pub struct LegacyOrdersSource {
    repo: DashboardRepository,
}

impl LegacyOrdersSource {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl OrdersSource for LegacyOrdersSource {
    fn name(&self) -> &'static str {
        "log_legado"
    }

    async fn fetch_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<CanonicalOrder>, AppError> {
        let rows = self.repo.legacy_orders_since(cutoff).await?;
        Ok(rows.iter().map(normalizer::from_legacy_line).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Stub {
        Rows(Vec<SalesPoint>),
        Empty,
        Fails,
    }

    struct StubSeries {
        behavior: Stub,
        calls: AtomicUsize,
    }

    impl StubSeries {
        fn new(behavior: Stub) -> Arc<Self> {
            Arc::new(Self { behavior, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl SeriesSource for StubSeries {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self) -> Result<Vec<SalesPoint>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Stub::Rows(rows) => Ok(rows.clone()),
                Stub::Empty => Ok(Vec::new()),
                Stub::Fails => Err(AppError::InternalServerError(anyhow!("fonte fora do ar"))),
            }
        }
    }

    fn point(date: &str, total: i64) -> SalesPoint {
        SalesPoint { date: date.to_string(), total: Decimal::from(total) }
    }

    #[tokio::test]
    async fn primeira_fonte_populada_vence() {
        let primary = StubSeries::new(Stub::Rows(vec![point("2026-08-03", 100)]));
        let fallback = StubSeries::new(Stub::Rows(vec![point("2026-08-03", 999)]));
        let sources: Vec<Arc<dyn SeriesSource>> = vec![primary.clone(), fallback.clone()];

        let series = resolve_series(&sources).await;

        assert_eq!(series, vec![point("2026-08-03", 100)]);
        // A fonte seguinte nem foi consultada.
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falha_da_primaria_cai_para_a_proxima() {
        let primary = StubSeries::new(Stub::Fails);
        let fallback = StubSeries::new(Stub::Rows(vec![
            point("2026-08-03", 10),
            point("2026-08-04", 20),
        ]));
        let sources: Vec<Arc<dyn SeriesSource>> = vec![primary, fallback];

        let series = resolve_series(&sources).await;

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, "2026-08-03");
    }

    #[tokio::test]
    async fn primaria_vazia_cai_para_a_proxima() {
        let primary = StubSeries::new(Stub::Empty);
        let fallback = StubSeries::new(Stub::Rows(vec![point("2026-08-05", 50)]));
        let sources: Vec<Arc<dyn SeriesSource>> = vec![primary.clone(), fallback];

        let series = resolve_series(&sources).await;

        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(series, vec![point("2026-08-05", 50)]);
    }

    #[tokio::test]
    async fn cadeia_toda_vazia_devolve_vazio_sem_erro() {
        let sources: Vec<Arc<dyn SeriesSource>> =
            vec![StubSeries::new(Stub::Fails), StubSeries::new(Stub::Empty)];

        let series = resolve_series(&sources).await;

        assert!(series.is_empty());
    }

    struct StubOrders {
        orders: Vec<CanonicalOrder>,
        calls: AtomicUsize,
    }

    impl StubOrders {
        fn new(orders: Vec<CanonicalOrder>) -> Arc<Self> {
            Arc::new(Self { orders, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl OrdersSource for StubOrders {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch_since(
            &self,
            _cutoff: DateTime<Utc>,
        ) -> Result<Vec<CanonicalOrder>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.orders.clone())
        }
    }

    fn order(total: i64) -> CanonicalOrder {
        use chrono::TimeZone;
        CanonicalOrder {
            id: uuid::Uuid::new_v4(),
            items_summary: "1 items".to_string(),
            quantity: 1,
            total_amount: Decimal::from(total),
            payment_method: String::new(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap(),
            customer_id: None,
            store_id: None,
        }
    }

    #[tokio::test]
    async fn log_legado_nao_e_consultado_quando_ha_registros_de_transacao() {
        let primary = StubOrders::new(vec![order(10)]);
        let legacy = StubOrders::new(vec![order(999)]);
        let sources: Vec<Arc<dyn OrdersSource>> = vec![primary, legacy.clone()];

        let records = resolve_orders(&sources, Utc::now()).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_amount, Decimal::from(10));
        assert_eq!(legacy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn sem_registros_de_transacao_o_legado_assume() {
        let primary = StubOrders::new(Vec::new());
        let legacy = StubOrders::new(vec![order(30), order(40)]);
        let sources: Vec<Arc<dyn OrdersSource>> = vec![primary, legacy];

        let records = resolve_orders(&sources, Utc::now()).await;

        assert_eq!(records.len(), 2);
    }
}
