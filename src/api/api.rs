use actix_cors::Cors;
use actix_web::{self, http::header, middleware::Logger, web, App, HttpServer};

use crate::{
    config::Settings,
    storage::{build_store, TodoStore},
};

use super::{errors::TodoApiError, health_handler, todos_handler};

pub const ALLOWED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "OPTIONS"];
pub const MAX_AGE_SECONDS: usize = 86400;

/// Json extractor config answering bad bodies with the `{"error": ..}` envelope.
/// Bodies are parsed as JSON whatever their content type.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| TodoApiError::from(err).into())
}

/// Allow-list CORS for the api scope
///
/// Requests from other origins still reach the handlers, without
/// `Access-Control-Allow-Origin`, and the browser blocks them.
fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(ALLOWED_METHODS)
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(MAX_AGE_SECONDS)
        .block_on_origin_mismatch(false)
}

/// Route table, handlers expect a `web::Data<dyn TodoStore>` in the app data
pub fn todo_routes(allowed_origins: &[String]) -> impl FnOnce(&mut web::ServiceConfig) {
    let cors = cors(allowed_origins);

    move |cfg| {
        cfg.app_data(json_config())
            .service(health_handler::index)
            .service(health_handler::health)
            .service(
                web::scope("/api").wrap(cors).service(
                    web::scope("/todos")
                        .route("", web::get().to(todos_handler::get_todos))
                        .route("", web::post().to(todos_handler::create_todo))
                        .route("/{id}", web::get().to(todos_handler::get_todo))
                        .route("/{id}", web::put().to(todos_handler::update_todo))
                        .route("/{id}", web::delete().to(todos_handler::delete_todo)),
                ),
            );
    }
}

#[actix_web::main]
pub async fn start_server(settings: Settings) -> anyhow::Result<()> {
    let store: std::sync::Arc<dyn TodoStore> = build_store(&settings)?;

    log::info!(
        "Starting todo server on {} with {:?} storage",
        settings.bind_addr,
        settings.storage
    );
    log::info!("CORS origins: {}", settings.cors_origins.join(", "));

    let origins = settings.cors_origins.clone();

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::from(store.clone()))
            .configure(todo_routes(&origins))
    });

    if let Some(workers) = settings.workers {
        server = server.workers(workers); // Num of threads
    }

    server.bind(settings.bind_addr.as_str())?.run().await?;

    Ok(())
}
