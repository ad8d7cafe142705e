// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_summary,
        handlers::dashboard::get_sales_chart,
        handlers::dashboard::get_recent_orders,
        handlers::dashboard::get_popular_products,
        handlers::dashboard::get_weekly_window,
    ),
    components(
        schemas(
            models::dashboard::DashboardPayload,
            models::dashboard::TodaySummary,
            models::dashboard::SalesPoint,
            models::dashboard::WeekPoint,
            models::dashboard::PopularProduct,
            models::orders::CanonicalOrder,
        )
    ),
    tags(
        (name = "Dashboard", description = "Métricas agregadas do ponto de venda")
    )
)]
pub struct ApiDoc;
