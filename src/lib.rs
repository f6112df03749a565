//! Contact management dashboard: a cached view of the remote contact API with
//! search, filtering, pagination, exports and confirmation-gated deletes.

#[cfg(feature = "server")]
use std::time::Duration;

#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::HttpRepository;
#[cfg(feature = "server")]
use crate::services::main::DashboardState;
#[cfg(feature = "server")]
use crate::services::store::refresh;

pub mod domain;
pub mod dto;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod pdf;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let repo = HttpRepository::new(
        &server_config.api_base_url,
        Duration::from_secs(server_config.request_timeout_secs),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;

    let state = web::Data::new(DashboardState::default());

    // The dashboard still starts when the API is down; the index page retries.
    if let Err(e) = refresh(&repo, &state.store).await {
        log::warn!("Initial contact load failed: {e}");
    }

    let secret_key = Key::try_from(server_config.secret.as_bytes())
        .map_err(|e| std::io::Error::other(format!("Invalid secret key: {e}")))?;

    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    let repo = web::Data::new(repo);
    let app_state = state.clone();

    log::info!(
        "Serving contacts from {} on {}:{}",
        server_config.api_base_url,
        server_config.address,
        server_config.port
    );

    let result = HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(routes::configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(repo.clone())
            .app_data(app_state.clone())
    })
    .bind(bind_address)?
    .run()
    .await;

    state.store.close();
    result
}
