use std::io;

use axum::{http::StatusCode, routing::get_service, Router};
use deadpool::managed::Pool;
use diesel_async::{pooled_connection::AsyncDieselConnectionManager, AsyncPgConnection};
use tower_http::services::ServeDir;

pub mod api;
pub mod auth;
pub mod error;
pub mod media;
pub mod models;
pub mod pagination;
pub mod schema;
pub mod store;
pub mod workflow;

pub type DbPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

pub fn connect_to_db(db_url: &str) -> Pool<AsyncDieselConnectionManager<AsyncPgConnection>> {
    let db_config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);
    Pool::builder(db_config)
        .build()
        .expect("failed to build database pool")
}

/// The full application router. Uploaded media is served straight from the
/// binary only when the dev flag says so; deployments put a file server in
/// front instead.
pub fn app(media_config: &media::MediaConfig) -> Router {
    let router = Router::new().nest("/api", api::app());
    if media_config.serve {
        let serve = get_service(ServeDir::new(&media_config.root)).handle_error(handle_error);
        router.nest("/media", serve)
    } else {
        router
    }
}

async fn handle_error(_: io::Error) -> error::AppError {
    error::AppError::from(StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch media")
}
