mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod transaction;

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{App, HttpServer, rt, web};
use dotenvy::dotenv;
use log::{info, warn};

use api::AppState;
use config::NodeConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();
    let (host, port) = (config.host.clone(), config.port);
    info!("⛓️ Starting node {} at http://{host}:{port}", config.node_id);

    let state = AppState::new(config).map_err(io::Error::other)?;
    let state = web::Data::new(state);
    let shutdown = state.shutdown.clone();

    // Searches must see the flag while actix is still draining requests.
    rt::spawn(raise_on(
        async {
            if let Err(e) = rt::signal::ctrl_c().await {
                warn!("cannot listen for ctrl-c: {e}");
                std::future::pending::<()>().await;
            }
        },
        shutdown.clone(),
    ));

    let result = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    shutdown.store(true, Ordering::Relaxed);
    result
}

/// Raise `flag` once `signal` resolves.
async fn raise_on<F: Future<Output = ()>>(signal: F, flag: Arc<AtomicBool>) {
    signal.await;
    info!("shutdown requested, cancelling proof searches");
    flag.store(true, Ordering::Relaxed);
}
