// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    // Importamos os models para referenciar no Swagger
    models::{
        dashboard::{DashboardPayload, PopularProduct, SalesPoint, TodaySummary, WeekPoint},
        orders::CanonicalOrder,
    },
    services::{
        dashboard_service::{local_day_start, DEFAULT_RECENT_LIMIT},
        weekly_window::{weekly_window, WindowOrder},
    },
};

// ---
// Parâmetros de consulta do feed de pedidos recentes
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrdersParams {
    pub store_id: Option<String>,

    #[validate(range(min = 1, max = 100, message = "O limite deve estar entre 1 e 100."))]
    pub limit: Option<i64>,
}

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Payload agregado: série de vendas, resumo de hoje, pedidos recentes e produtos populares", body = DashboardPayload),
        (status = 400, description = "Parâmetros inválidos")
    ),
    params(
        ("storeId" = Option<String>, Query, description = "Filtra os pedidos recentes por loja"),
        ("limit" = Option<i64>, Query, description = "Máximo de pedidos recentes (1 a 100, padrão 10)")
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    Query(params): Query<RecentOrdersParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    // O relógio só é lido aqui, na borda: o serviço recebe o corte pronto.
    let cutoff = local_day_start(Local::now());

    let payload = app_state
        .dashboard_service
        .dashboard(
            cutoff,
            params.store_id.as_deref(),
            params.limit.unwrap_or(DEFAULT_RECENT_LIMIT),
        )
        .await?;

    Ok((StatusCode::OK, Json(payload)))
}

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo do dia: total vendido, clientes distintos, pedidos e ticket médio", body = TodaySummary)
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let cutoff = local_day_start(Local::now());
    let summary = app_state.dashboard_service.today_summary(cutoff).await?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/sales-chart
#[utoipa::path(
    get,
    path = "/api/dashboard/sales-chart",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Série global de vendas por dia, ascendente por data", body = Vec<SalesPoint>)
    )
)]
pub async fn get_sales_chart(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let chart = app_state.dashboard_service.weekly_sales().await?;

    Ok((StatusCode::OK, Json(chart)))
}

// GET /api/dashboard/recent-orders
#[utoipa::path(
    get,
    path = "/api/dashboard/recent-orders",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Pedidos mais recentes, normalizados para exibição", body = Vec<CanonicalOrder>),
        (status = 400, description = "Parâmetros inválidos")
    ),
    params(
        ("storeId" = Option<String>, Query, description = "Filtra por loja"),
        ("limit" = Option<i64>, Query, description = "Máximo de pedidos (1 a 100, padrão 10)")
    )
)]
pub async fn get_recent_orders(
    State(app_state): State<AppState>,
    Query(params): Query<RecentOrdersParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let orders = app_state
        .dashboard_service
        .recent_orders(
            params.store_id.as_deref(),
            params.limit.unwrap_or(DEFAULT_RECENT_LIMIT),
        )
        .await?;

    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/dashboard/popular-products
#[utoipa::path(
    get,
    path = "/api/dashboard/popular-products",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Top 5 produtos por unidades vendidas", body = Vec<PopularProduct>)
    )
)]
pub async fn get_popular_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.dashboard_service.popular_products().await?;

    Ok((StatusCode::OK, Json(products)))
}

// GET /api/dashboard/weekly-window
#[utoipa::path(
    get,
    path = "/api/dashboard/weekly-window",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Os 7 pontos Segunda -> Domingo da semana que contém o momento atual", body = Vec<WeekPoint>)
    )
)]
pub async fn get_weekly_window(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let recent = app_state
        .dashboard_service
        .recent_orders(None, DEFAULT_RECENT_LIMIT)
        .await?;

    // Cada requisição reavalia a janela contra o relógio atual: a virada de
    // meia-noite ou de semana aparece no próximo poll, sem estado guardado.
    let orders: Vec<WindowOrder> = recent.iter().map(WindowOrder::from).collect();
    let points = weekly_window(&Local::now(), &orders);

    Ok((StatusCode::OK, Json(points)))
}
