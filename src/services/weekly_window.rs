// src/services/weekly_window.rs
//
// A janela Segunda -> Domingo que alimenta o gráfico. Função pura de
// (agora, pedidos): sem estado de semana persistido, a virada de dia ou de
// semana aparece simplesmente porque cada avaliação parte do relógio atual.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{dashboard::WeekPoint, orders::CanonicalOrder};

// Forma tolerante que a janela consome. Payloads heterogêneos podem trazer
// o valor sob nomes diferentes e o dia como timestamp ou como chave literal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOrder {
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    // Chave de dia literal, fonte secundária quando o timestamp está ausente.
    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
}

impl From<&CanonicalOrder> for WindowOrder {
    fn from(order: &CanonicalOrder) -> Self {
        Self {
            created_at: Some(order.created_at),
            date: None,
            total_amount: Some(order.total_amount),
            amount: None,
            total: None,
        }
    }
}

// Lista ordenada de acessores de valor: o primeiro presente e não-zero
// vence; sem nenhum, o pedido contribui com 0.
type AmountAccessor = fn(&WindowOrder) -> Option<Decimal>;

const AMOUNT_ACCESSORS: &[(&str, AmountAccessor)] = &[
    ("totalAmount", |o| o.total_amount),
    ("amount", |o| o.amount),
    ("total", |o| o.total),
];

pub fn order_amount(order: &WindowOrder) -> Decimal {
    AMOUNT_ACCESSORS
        .iter()
        .find_map(|(_, get)| get(order).filter(|v| !v.is_zero()))
        .unwrap_or(Decimal::ZERO)
}

// A segunda-feira que abre a semana contendo `now`.
// Semana ISO (Seg -> Dom), independente do início de semana do locale:
// domingo recua 6 dias, os demais recuam (dia da semana - 1).
pub fn week_monday<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    let days_back = u64::from(now.weekday().num_days_from_monday());
    now.date_naive() - Days::new(days_back)
}

// Projeta os pedidos nos 7 baldes diários da semana que contém `now`.
// Pedido com dia fora da janela pertence a outra semana e é ignorado.
pub fn weekly_window<Tz: TimeZone>(now: &DateTime<Tz>, orders: &[WindowOrder]) -> Vec<WeekPoint> {
    let monday = week_monday(now);
    let days: Vec<NaiveDate> = (0..7).map(|i| monday + Days::new(i)).collect();
    let mut buckets = [Decimal::ZERO; 7];

    for order in orders {
        let day = order
            .created_at
            .as_ref()
            .map(|t| t.with_timezone(&now.timezone()).date_naive())
            .or(order.date);
        let Some(day) = day else { continue };

        let offset = (day - monday).num_days();
        if !(0..7).contains(&offset) {
            continue;
        }
        buckets[offset as usize] += order_amount(order);
    }

    days.iter()
        .zip(buckets)
        .map(|(day, total)| WeekPoint {
            label: day.format("%A, %b %-d").to_string(),
            total,
        })
        .collect()
}
