use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

use kith::storage::MemoryAccountStore;

use kith_server::api::auth_service::AuthService;
use kith_server::api::create_router;
use kith_server::cli::CliArgs;
use kith_server::config::ServerConfig;
use kith_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli_args = CliArgs::parse();

    // Set up logging
    let filter = if let Some(ref level) = cli_args.log_level {
        tracing_subscriber::EnvFilter::new(level)
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Kith server v{}", kith::VERSION);

    // Load configuration from CLI arguments and environment variables
    let server_config = ServerConfig::from_cli_and_env(cli_args)?;
    info!("Server configuration loaded");

    let store = Arc::new(MemoryAccountStore::new());
    let mut app_state = AppState::new(store, server_config.clone());

    if server_config.enable_auth {
        let auth_service =
            AuthService::new(server_config.jwt_secret.clone(), server_config.base_url.clone())
                .with_expiration_hours(
                    server_config.jwt_expiration_hours,
                    server_config.verification_token_hours,
                );
        app_state.set_auth_service(auth_service);
    }

    let app_state = Arc::new(app_state);

    // Create the router with all API endpoints
    let app = create_router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(server_config.max_request_size));

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("API documentation available at http://{}/docs", addr);

    if server_config.enable_auth {
        info!("Authentication is enabled");
        if server_config.allow_signup {
            info!("Account signup is enabled");
        } else {
            info!("Account signup is disabled");
        }
    } else {
        info!("Authentication is disabled");
    }
    if server_config.strict_relationship_guards {
        info!("Strict relationship guards are enabled");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
