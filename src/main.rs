use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use cellar_proxy::config::Settings;
use cellar_proxy::routes::{self, AppState};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn build_cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header(),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    // Initialize logging; RUST_LOG wins over the configured level
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

    info!("Starting cellar proxy...");
    info!("Configuration loaded successfully");

    let app_state = AppState::from_settings(&settings).map_err(|e| {
        error!("Failed to initialize upstream clients: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    for kind in [cellar_proxy::ProviderKind::Gemini, cellar_proxy::ProviderKind::OpenAi] {
        let proxy = app_state.proxy(kind);
        if proxy.is_configured() {
            info!("{} proxy ready (default model: {})", kind, proxy.resolver().default_model());
        } else {
            warn!("{} API key not set; /api/{} will answer 500", kind.label(), kind);
        }
    }
    if !app_state.vision.is_configured() {
        warn!("No text detection key set; label scanning is disabled");
    }

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let cors_origin = settings.server.cors_origin.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(build_cors(cors_origin.as_deref()))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
