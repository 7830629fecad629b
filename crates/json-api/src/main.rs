//! Flash-sale JSON API Server

use std::{process, sync::Arc, time::Duration};

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::error;

use flashsale_app::{context::AppContext, sweeper::Sweeper};

use crate::{config::ServerConfig, state::State};

mod config;
mod extensions;
mod healthcheck;
mod holds;
mod logging;
mod orders;
mod products;
mod router;
mod shutdown;
mod state;
mod webhooks;

#[cfg(test)]
mod test_helpers;

/// Flash-sale JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    logging::init(&config);

    let addr = config.socket_addr();
    tracing::info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let app = match AppContext::from_database_url(&config.database_url, config.app_settings()).await
    {
        Ok(app) => app,
        Err(app_error) => {
            error!("failed to initialise application: {app_error}");
            process::exit(1);
        }
    };

    // The sweeper runs as an independent periodic task, outside the
    // request path.
    let sweeper = Sweeper::new(
        Arc::clone(&app.holds),
        Duration::from_secs(config.sweep_interval_seconds),
    );
    tokio::spawn(sweeper.run());

    let state = State::from_app_context(app);

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(router::app_router());

    let doc = OpenApi::new("Flash-sale API", "0.1.0").merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;
}
