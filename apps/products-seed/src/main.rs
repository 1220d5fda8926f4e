//! Products seed - wipes the product collection and loads the fixture catalog

use core_config::{
    tracing::{init_tracing, install_color_eyre},
    Environment, FromEnv,
};
use database::mongodb::{connect_from_config_with_retry, MongoConfig};
use domain_products::{reseed, MongoProductRepository};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let config = MongoConfig::from_env()?.with_app_name(env!("CARGO_PKG_NAME"));
    let client = connect_from_config_with_retry(&config, None).await?;
    let db = client.database(config.database());

    let report = reseed(&MongoProductRepository::new(&db)).await?;
    info!(
        deleted = report.deleted,
        inserted = report.inserted,
        "Seeded database {}",
        config.database()
    );

    client.shutdown().await;
    Ok(())
}
