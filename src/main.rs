//! PR reviewers server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pr_reviewers_lib::api::{self, ApiDoc, AppState};
use pr_reviewers_lib::config::Config;
use pr_reviewers_lib::db::DbPool;
use pr_reviewers_lib::middleware::{REQUEST_ID_HEADER, RequestLogger};
use pr_reviewers_lib::services::{SystemClock, ThreadRandomizer};

/// Check that configuration loads and the database answers (Docker HEALTHCHECK).
async fn health_check() -> bool {
    let Ok(config) = Config::from_env() else {
        return false;
    };
    match DbPool::connect(&config.database).await {
        Ok(pool) => pool.ping().await.is_ok(),
        Err(_) => false,
    }
}

fn cors(is_development: bool) -> Cors {
    let cors = if is_development {
        Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
    } else {
        // Same-origin only
        Cors::default()
    };
    cors.allowed_methods(vec!["GET", "POST", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers(vec![header::HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(if health_check().await { 0 } else { 1 });
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL and PRR_HOST must be set");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  PR Reviewers Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let pool = match DbPool::connect(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        }
    };
    info!("Database connection established");

    if config.database.run_migrations {
        if let Err(e) = pool.run_migrations().await {
            error!(error = %e, "Failed to run migrations");
            std::process::exit(1);
        }
        info!("Database migrations complete");
    }

    let state = web::Data::new(AppState::new(
        Arc::new(pool),
        Arc::new(ThreadRandomizer),
        Arc::new(SystemClock),
        config.max_pr_reviewers,
    ));
    info!(max_pr_reviewers = config.max_pr_reviewers, "Reviewer assignment configured");

    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    HttpServer::new(move || {
        App::new()
            // CORS is registered before other middleware
            .wrap(cors(is_development))
            .wrap(RequestLogger)
            .app_data(state.clone())
            .configure(api::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run()
    .await
}
