use clap::Parser;
use dotenvy::dotenv;

use remedi_backend::api::{create_router, AppState};
use remedi_backend::cli::Cli;
use remedi_backend::config::Config;
use remedi_backend::error::AppError;
use remedi_backend::logging::init_logging;
use remedi_backend::services::gemini::GeminiClient;

fn fail(err: AppError) -> ! {
    tracing::error!("{}", err);
    std::process::exit(1);
}

/// Merge command-line overrides over the environment config.
fn resolve_config(env: Result<Config, String>, cli: &Cli) -> Result<Config, AppError> {
    env.and_then(|config| config.with_cli(cli))
        .map_err(AppError::Config)
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = resolve_config(Config::from_env(), &cli).unwrap_or_else(|err| fail(err));

    if cli.list_models {
        list_models(&config).await;
        return;
    }

    tracing::info!("Service starting with config: {:?}", config);

    let state = AppState::from_config(&config).unwrap_or_else(|err| fail(err));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|err| fail(AppError::Config(format!("cannot bind {}: {}", addr, err))));

    tracing::info!("Remedi backend listening on {}", addr);

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", err);
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}

/// Print every model usable for `generateContent`, one per line.
async fn list_models(config: &Config) {
    let client = GeminiClient::new(&config.generation)
        .unwrap_or_else(|err| fail(AppError::Config(format!("generation client: {}", err))));

    let names = client
        .list_models()
        .await
        .unwrap_or_else(|err| fail(AppError::from(err)));

    if names.is_empty() {
        tracing::warn!("No text generation models found; check the API key permissions");
        return;
    }
    for name in names {
        println!("{}", name);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
