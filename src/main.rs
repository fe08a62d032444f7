mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::cricket_api::{CricketApiClient, CricketDataSource};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    // RUST_LOG=debug pour plus de détails (les logs actix passent aussi par ici)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "invalid configuration");
        io::Error::other(e)
    })?;

    info!("connecting to database");
    let db = db::establish_connection(&config).await.map_err(|e| {
        error!(error = %e, "failed to connect to database");
        io::Error::other(e)
    })?;

    if config.sync_schema {
        db::sync_schema(&db).await.map_err(|e| {
            error!(error = %e, "failed to sync database schema");
            io::Error::other(e)
        })?;
    }

    let cricket: Arc<dyn CricketDataSource> = Arc::new(CricketApiClient::from_config(&config));
    let cricket = web::Data::from(cricket);
    let db = web::Data::new(db);
    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);

    info!(host = %bind.0, port = bind.1, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(config.clone())
            .app_data(cricket.clone())
            // Corps JSON illisible: même format d'erreur que le reste de l'API
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::bad_request(err.to_string()).into()
            }))
            .configure(routes::configure_routes)
    })
        .bind(bind)?
        .run()
        .await
}
