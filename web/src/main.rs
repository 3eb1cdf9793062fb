//! Petstore Web binary

use petstore_web::WebConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = WebConfig::load()?;
    petstore_web::start_server(config).await
}
