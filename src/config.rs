// src/config.rs

use crate::{db::DashboardRepository, services::DashboardService};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Conecta ao banco de dados, usando '?' para propagar erros.
        // O acquire_timeout garante que nenhuma consulta fique bloqueada
        // indefinidamente esperando conexão.
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let dashboard_service = DashboardService::new(dashboard_repo);

        Ok(Self { db_pool, dashboard_service })
    }
}
