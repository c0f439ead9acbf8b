// src/config.rs

pub mod database;

use std::{env, path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::{
    db::{mock::MockBackend, mssql::MssqlBackend, SalesBackend},
    models::periods::YearMonth,
    services::{
        admin_service::AdminService, auth::AuthService, dashboard_service::DashboardService,
        period_store::PeriodStore, static_files::StaticFiles, user_directory::UserDirectory,
    },
};

pub use database::DatabaseConfig;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_STATIC_DIR: &str = "web";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Valor inválido para {var}: '{value}'")]
    InvalidValue { var: String, value: String },
}

// Qual backend atende os procedures: SQL Server de verdade ou o mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendMode {
    Mock,
    Mssql(DatabaseConfig),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub static_dir: PathBuf,
    pub backend: BackendMode,
}

impl Config {
    /// Lê o `.env` (se houver) e as variáveis de ambiente.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "PORT".into(),
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let static_dir = lookup("STATIC_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let use_mssql = lookup("USE_MSSQL")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let backend = if use_mssql {
            BackendMode::Mssql(DatabaseConfig::from_lookup(lookup)?)
        } else {
            BackendMode::Mock
        };

        Ok(Self { port, static_dir, backend })
    }

    pub fn log_summary(&self) {
        tracing::info!("🔧 Configuração:");
        tracing::info!("   PORT: {}", self.port);
        tracing::info!("   STATIC_DIR: {}", self.static_dir.display());
        match &self.backend {
            BackendMode::Mock => tracing::info!("   USE_MSSQL: false (usuários mock)"),
            BackendMode::Mssql(db) => tracing::info!("   USE_MSSQL: true {:?}", db),
        }
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn SalesBackend>,
    pub auth_service: AuthService,
    pub dashboard_service: DashboardService,
    pub admin_service: AdminService,
    pub period_store: Arc<PeriodStore>,
    pub user_directory: Arc<UserDirectory>,
    pub static_files: StaticFiles,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let backend: Arc<dyn SalesBackend> = match &config.backend {
            BackendMode::Mssql(db) => Arc::new(MssqlBackend::new(db)?),
            BackendMode::Mock => Arc::new(MockBackend::seeded()),
        };
        tracing::info!("🗄️ Backend de dados: {}", backend.kind().label());

        Ok(Self::with_backend(config, backend))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_backend(config: Config, backend: Arc<dyn SalesBackend>) -> Self {
        let static_files = StaticFiles::new(&config.static_dir);

        Self {
            auth_service: AuthService::new(backend.clone()),
            dashboard_service: DashboardService::new(backend.clone()),
            admin_service: AdminService::new(backend.clone()),
            period_store: Arc::new(PeriodStore::new(YearMonth::current_utc())),
            user_directory: Arc::new(UserDirectory::seeded()),
            static_files,
            config: Arc::new(config),
            backend,
        }
    }
}
