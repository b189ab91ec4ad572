use axum::{http::Method, Extension};
use campus_event_hub::{auth::ensure_jwt_secret_is_valid, connect_to_db, media::MediaConfig};
use envconfig::Envconfig;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

#[derive(Envconfig)]
struct Config {
    #[envconfig(from = "DATABASE_URL")]
    pub db_url: String,
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,
    #[envconfig(from = "MEDIA_ROOT", default = "media")]
    pub media_root: String,
    // dev flag; production serves media from a real web server
    #[envconfig(from = "SERVE_MEDIA", default = "false")]
    pub serve_media: bool,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::init_from_env().unwrap();
    ensure_jwt_secret_is_valid();

    let pool = connect_to_db(&config.db_url);
    let media_config = MediaConfig {
        root: config.media_root.into(),
        serve: config.serve_media,
    };
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);
    let app = campus_event_hub::app(&media_config)
        .layer(Extension(pool))
        .layer(Extension(media_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!("listening on port {}", config.port);
    axum::Server::bind(&([0, 0, 0, 0], config.port).into())
        .serve(app.into_make_service())
        .await
        .unwrap();
}
