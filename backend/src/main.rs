use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::sqlite::SqlitePoolOptions;

mod config;
mod handlers;
mod models;
mod services;

use config::Config;

async fn index(state: web::Data<models::AppState>) -> actix_web::Result<NamedFile> {
    let static_path = state.config.static_files_path.as_deref().unwrap_or("./static");
    Ok(NamedFile::open(format!("{}/index.html", static_path))?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    log::info!("Starting server at {}:{}", config.host, config.port);

    if let Some(ref path) = config.static_files_path {
        log::info!("Serving static files from: {}", path);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    log::info!("Database migrations completed");

    let app_state = web::Data::new(models::AppState {
        db: pool,
        config: config.clone(),
    });

    let static_files_path = config.static_files_path.clone();
    let allowed_origins = config.cors_origins.clone();

    HttpServer::new(move || {
        let allowed_origins = allowed_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origin_str = origin.to_str().unwrap_or("");
                allowed_origins.iter().any(|allowed| origin_str.starts_with(allowed))
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
            .allowed_headers(vec!["Content-Type"])
            .max_age(3600);

        let mut app = App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(handlers::configure_routes);

        // Serve the compiled frontend if a path is configured
        if let Some(ref path) = static_files_path {
            app = app
                .service(Files::new("/pkg", format!("{}/pkg", path)))
                .service(Files::new("/assets", format!("{}/assets", path)))
                .default_service(web::route().to(index));
        }

        app
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
