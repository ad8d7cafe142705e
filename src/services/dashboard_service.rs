// src/services/dashboard_service.rs

use chrono::{DateTime, Local, LocalResult, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{
        dashboard::{DashboardPayload, PopularProduct, SalesPoint, TodaySummary},
        orders::CanonicalOrder,
    },
    services::{
        normalizer,
        sources::{
            resolve_orders, resolve_series, AggregatedSalesSource, LegacyOrdersSource,
            OrderRecordSeriesSource, OrdersSource, SeriesSource, TransactionOrdersSource,
        },
    },
};

pub const DEFAULT_RECENT_LIMIT: i64 = 10;
pub const POPULAR_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    // Cadeias de fallback em ordem de precedência (a primeira populada vence).
    series_sources: Vec<Arc<dyn SeriesSource>>,
    today_sources: Vec<Arc<dyn OrdersSource>>,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        let series_sources: Vec<Arc<dyn SeriesSource>> = vec![
            Arc::new(AggregatedSalesSource::new(repo.clone())),
            Arc::new(OrderRecordSeriesSource::new(repo.clone())),
        ];
        let today_sources: Vec<Arc<dyn OrdersSource>> = vec![
            Arc::new(TransactionOrdersSource::new(repo.clone())),
            Arc::new(LegacyOrdersSource::new(repo.clone())),
        ];

        Self { repo, series_sources, today_sources }
    }

    // 1. Série global de vendas, ascendente por data.
    // Pior caso (todas as fontes falham ou vazias): série vazia, nunca erro.
    pub async fn weekly_sales(&self) -> Result<Vec<SalesPoint>, AppError> {
        Ok(resolve_series(&self.series_sources).await)
    }

    // 2. Resumo de hoje. O corte é o início do dia de calendário local,
    // injetado pelo chamador — o serviço não lê o relógio.
    pub async fn today_summary(&self, cutoff: DateTime<Utc>) -> Result<TodaySummary, AppError> {
        let records = resolve_orders(&self.today_sources, cutoff).await;
        Ok(today_summary_of(&records))
    }

    // 3. Feed de pedidos recentes, sempre da fonte por transação.
    pub async fn recent_orders(
        &self,
        store_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<CanonicalOrder>, AppError> {
        let rows = self.repo.recent_order_records(store_id, limit).await?;
        Ok(rows.iter().map(normalizer::from_order_record).collect())
    }

    // 4. Top 5 produtos por unidades vendidas. Leitura direta, sem fallback.
    pub async fn popular_products(&self) -> Result<Vec<PopularProduct>, AppError> {
        self.repo.popular_products(POPULAR_LIMIT).await
    }

    // O payload agregado que a apresentação consome num único GET.
    pub async fn dashboard(
        &self,
        cutoff: DateTime<Utc>,
        store_id: Option<&str>,
        limit: i64,
    ) -> Result<DashboardPayload, AppError> {
        let weekly_sales = self.weekly_sales().await?;
        let summary = self.today_summary(cutoff).await?;
        let recent_orders = self.recent_orders(store_id, limit).await?;
        let popular_products = self.popular_products().await?;

        Ok(DashboardPayload { weekly_sales, summary, recent_orders, popular_products })
    }
}

// Redução pura do resumo do dia sobre pedidos canônicos.
pub fn today_summary_of(orders: &[CanonicalOrder]) -> TodaySummary {
    let total_orders = orders.len() as i64;
    let total_sales: Decimal = orders.iter().map(|o| o.total_amount).sum();

    // O normalizador já aparou os identificadores; o filtro de vazios aqui é
    // só para pedidos construídos fora dele.
    let customers: HashSet<&str> = orders
        .iter()
        .filter_map(|o| o.customer_id.as_deref())
        .filter(|c| !c.trim().is_empty())
        .collect();

    let avg_sale = if total_orders > 0 {
        total_sales / Decimal::from(total_orders)
    } else {
        Decimal::ZERO
    };

    TodaySummary {
        total_sales,
        total_customers: customers.len() as i64,
        total_orders,
        avg_sale,
    }
}

// Início do dia de calendário local (horas, minutos, segundos zerados),
// como instante UTC para comparar com created_at.
pub fn local_day_start(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("00:00:00 é sempre uma hora válida");

    match midnight.and_local_timezone(Local) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.to_utc(),
        // Fuso em que a meia-noite não existe (transição de horário de
        // verão): o próprio instante serve de corte.
        LocalResult::None => now.to_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn order(total: i64, customer: Option<&str>) -> CanonicalOrder {
        CanonicalOrder {
            id: Uuid::new_v4(),
            items_summary: "1 items".to_string(),
            quantity: 1,
            total_amount: Decimal::from(total),
            payment_method: String::new(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap(),
            customer_id: customer.map(str::to_string),
            store_id: None,
        }
    }

    #[test]
    fn resumo_vazio_zera_tudo_inclusive_a_media() {
        let summary = today_summary_of(&[]);

        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.total_sales, Decimal::ZERO);
        assert_eq!(summary.total_customers, 0);
        assert_eq!(summary.avg_sale, Decimal::ZERO);
    }

    #[test]
    fn media_e_total_dividido_pela_contagem() {
        let orders = vec![order(30, Some("c1")), order(10, Some("c2"))];

        let summary = today_summary_of(&orders);

        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.total_sales, Decimal::from(40));
        assert_eq!(summary.avg_sale, Decimal::from(20));
    }

    #[test]
    fn clientes_distintos_nao_excedem_pedidos_e_anonimos_nao_contam() {
        let orders = vec![
            order(10, Some("c1")),
            order(20, Some("c1")), // repetido
            order(30, None),       // anônimo
            order(40, Some("c2")),
        ];

        let summary = today_summary_of(&orders);

        assert_eq!(summary.total_customers, 2);
        assert!(summary.total_customers <= summary.total_orders);
    }

    #[test]
    fn corte_do_dia_zera_o_horario_local() {
        let cutoff = local_day_start(Local::now());
        let local = cutoff.with_timezone(&Local);

        assert_eq!(local.time(), chrono::NaiveTime::MIN);
    }
}
