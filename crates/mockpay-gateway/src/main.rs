use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mockpay_gateway::{
    config::GatewayConfig, db::Database, metrics::register_metrics, routes, state::AppState,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env().expect("Failed to load configuration");
    let port = config.port;
    let allowed_origins = config.cors_allow_origins.clone();
    let rate_limit_rpm = config.rate_limit_rpm;

    tracing::info!("Starting mockpay-gateway on port {}", port);
    tracing::info!("Currency: {}", config.currency);
    tracing::info!("Simulated delay: {} ms", config.simulate_delay_ms);
    tracing::info!(
        "Force override: {}",
        if config.allow_force_param {
            "allowed"
        } else {
            "ignored"
        }
    );
    tracing::info!("Checkout base URL: {}", config.frontend_base_url);

    let db = Database::new(&config.db_path).expect("Failed to initialize database");
    tracing::info!("Database initialized at: {}", config.db_path);

    register_metrics();

    let state_data = web::Data::new(AppState::new(config, db));

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_minute(rate_limit_rpm as u64)
        .finish()
        .expect("Failed to create rate limiter config");

    HttpServer::new(move || {
        let cors = mockpay_gateway::cors::build_cors(&allowed_origins);

        App::new()
            .app_data(state_data.clone())
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .wrap(Logger::default())
            .wrap(cors)
            .wrap(Governor::new(&governor_conf))
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
