mod config;
mod error;
mod model;
mod query;
mod services;
mod store;

mod logger;

use {
    crate::{config::Config, logger::TracingLogger},
    actix_web::{middleware::NormalizePath, web, App, HttpServer},
    clap::Parser as _,
    color_eyre::eyre::WrapErr as _,
    tracing_log::LogTracer,
    tracing_subscriber::{fmt::Layer, layer::SubscriberExt as _, EnvFilter, Registry},
};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = Config::parse();

    LogTracer::init()?;

    tracing::subscriber::set_global_default(
        Registry::default()
            .with(EnvFilter::try_new(&config.log_filter)?)
            .with(Layer::default()),
    )?;

    // No retry: without a store there is nothing to serve.
    let store = store::connect(&config)
        .await
        .wrap_err("failed to connect to the document store")?;

    let store = web::Data::from(store);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .configure(services::configure)
            .wrap(TracingLogger)
            .wrap(NormalizePath::trim())
    });

    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let server = server.bind(config.bind)?;

    tracing::info!(address = %config.bind, "server is running");

    server.run().await?;

    Ok(())
}
