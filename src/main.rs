use actix_web::{middleware, web, App, HttpServer};
use masil_admin::config::Settings;
use masil_admin::routes::{self, AppState};
use masil_admin::services::{AdminApiClient, SessionStore};
use masil_admin::AdminConsole;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    // Initialize logging. RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Masil admin console...");

    let api = AdminApiClient::new(
        settings.backend.base_url.clone(),
        settings.backend.members_path.clone(),
        settings.backend.timeout(),
    )
    .map_err(|e| {
        error!("Failed to build backend client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    info!(
        "Backend client initialized ({}{}, timeout {:?})",
        settings.backend.base_url,
        settings.backend.members_path,
        settings.backend.timeout()
    );

    let sessions = SessionStore::new(settings.session.max_sessions, settings.session.idle_ttl_secs);

    info!(
        "Session store initialized (max: {} sessions, idle TTL: {}s)",
        settings.session.max_sessions, settings.session.idle_ttl_secs
    );

    // Build application state
    let app_state = AppState {
        console: AdminConsole::new(Arc::new(api)),
        sessions,
        cookie_name: settings.session.cookie_name.clone(),
        logout_url: settings.backend.logout_url(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::FormConfig::default().error_handler(routes::handle_form_payload_error))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(routes::handle_path_error))
            .wrap(routes::cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
