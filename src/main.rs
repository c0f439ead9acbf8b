//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use ventas_backend::{
    config::{AppState, Config},
    routes::build_router,
};

#[tokio::main]
async fn main() {
    // RUST_LOG manda; sem ele, nível info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Configuração inválida: a aplicação não deve iniciar.
    let config = Config::from_env().expect("Falha ao ler a configuração.");
    config.log_summary();

    let port = config.port;
    let static_dir = config.static_dir.clone();

    let app_state = AppState::new(config).expect("Falha ao inicializar o estado da aplicação.");
    let app = build_router(app_state);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");

    tracing::info!("🚀 Servidor escutando em http://localhost:{}", port);
    tracing::info!("📁 Servindo arquivos de: {}", static_dir.display());
    tracing::info!("📚 Swagger UI em http://localhost:{}/swagger-ui", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Erro no servidor Axum");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Falha ao instalar o handler de Ctrl+C: {}", e);
        return;
    }
    tracing::info!("👋 Encerrando o servidor...");
}
