pub mod api;
pub mod artist_list;
pub mod config;
pub mod errors;
pub mod metrics_defs;
pub mod service;

#[cfg(test)]
mod testutils;

use api::ArtistsApi;
use content_store::ContentStore;
use errors::ArtistsError;
use service::ArtistService;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::sync::Arc;

/// Serves the public API and the admin listener until either fails.
pub async fn run(config: config::Config, store: Arc<dyn ContentStore>) -> Result<(), ArtistsError> {
    let service = Arc::new(
        ArtistService::new(store, config.file_path.clone())
            .with_conflict_retries(config.conflict_retries),
    );

    let api_task = run_http_service(
        &config.listener.host,
        config.listener.port,
        ArtistsApi::new(service.clone()),
    );

    let ready_service = service.clone();
    let admin_task = async {
        run_http_service(
            &config.admin_listener.host,
            config.admin_listener.port,
            AdminService::new(move || ready_service.check_ready().map_err(|e| e.to_string())),
        )
        .await
        .map_err(ArtistsError::Io)
    };

    tokio::try_join!(api_task, admin_task)?;
    Ok(())
}
