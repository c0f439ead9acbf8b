// src/bin/check_connection.rs
// Diagnóstico da conexão com o SQL Server usando a mesma configuração do servidor.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use ventas_backend::{
    config::DatabaseConfig,
    db::MssqlBackend,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Mesmo com USE_MSSQL=false o diagnóstico olha as variáveis DB_*
    dotenvy::dotenv().ok();
    let db = match DatabaseConfig::from_lookup(&|key: &str| std::env::var(key).ok()) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("🔧 Configuração: {:?}", db);

    let backend = match MssqlBackend::new(&db) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    if backend.uses_sql_browser() {
        tracing::info!("🔎 Instância nomeada: a porta será resolvida pelo SQL Browser (UDP 1434)");
    }

    match backend.diagnostics().await {
        Ok(report) => {
            tracing::info!("✅ Conectado ao banco: {}", report.database);
            tracing::info!("📊 Versão: {}", report.version);

            if report.tables.is_empty() {
                tracing::warn!("⚠️ Nenhuma tabela nos schemas auth/ventas");
            } else {
                tracing::info!("📋 Tabelas encontradas:");
                for table in &report.tables {
                    tracing::info!("   - {}", table);
                }
            }

            if report.missing_procedures.is_empty() {
                tracing::info!("✅ Todos os stored procedures esperados existem");
            } else {
                for procedure in &report.missing_procedures {
                    tracing::warn!("⚠️ Stored procedure ausente: {}", procedure);
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("❌ Erro de conexão: {}", e);
            if let Some(code) = e.code() {
                tracing::error!("   Código: {}", code);
            }
            ExitCode::FAILURE
        }
    }
}
