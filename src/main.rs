use tokio::signal;

use dotenvy::dotenv;

use modverify_api::app::create_app;
use modverify_api::config::AppConfig;
use modverify_api::db::pool::{create_pool, run_migrations};
use modverify_api::email::EmailService;
use modverify_api::state::SharedAppState;
use modverify_api::utils::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv().ok();

  init_tracing();

  let config = AppConfig::from_env()?;

  let pool = create_pool(&config.database).await?;

  run_migrations(&pool).await?;

  tracing::info!("Database migrations applied successfully");

  let email_service = EmailService::new(config.smtp.clone())?;
  let app_state = SharedAppState::new(pool.clone(), email_service, config.public_base_url.clone())?;
  let app = create_app(app_state);

  let addr = format!("0.0.0.0:{}", config.port);
  let listener = tokio::net::TcpListener::bind(&addr).await?;

  tracing::info!("Server running on http://{}", addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  pool.close().await;
  tracing::info!("Server stopped");

  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::error!("Failed to install Ctrl+C handler: {}", e);
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut stream) => {
        stream.recv().await;
      }
      Err(e) => {
        tracing::error!("Failed to install signal handler: {}", e);
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
