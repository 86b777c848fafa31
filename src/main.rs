use std::sync::Arc;

use wayfinder::config::Config;
use wayfinder::engine::Engine;
use wayfinder::error::Error;
use wayfinder::external::mapbox::MapboxClient;
use wayfinder::server::{serve, DynAPI};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let mapbox = Arc::new(MapboxClient::new(
        config.api_base.clone(),
        config.access_token.clone(),
    ));
    let engine = Arc::new(Engine::new(&config, mapbox.clone(), mapbox));

    let (positions, reports) = async_channel::unbounded();

    let tracker = engine.clone();
    tokio::spawn(async move { tracker.track(reports).await });

    serve(engine as DynAPI, positions, config.listen_addr).await
}
