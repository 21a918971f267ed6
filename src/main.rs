use actix_web::{App, HttpServer, middleware, web};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ci_monitor::{AppState, Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ci_monitor=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!(
        "Starting CI Monitor on {}:{} ({:?}, {} data)",
        config.host, config.port, config.environment, config.data_mode
    );

    let state = AppState::from_config(config.clone()).map_err(|e| {
        error!("Failed to initialize data source: {e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    let app_state = web::Data::new(state);

    let server_addr = format!("{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .route("/health", web::get().to(handlers::health_check))
            .service(web::scope("/api").configure(handlers::configure_api_routes))
    })
    .bind(&server_addr)?
    .run()
    .await
}
