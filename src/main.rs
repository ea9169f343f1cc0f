use std::path::PathBuf;

pub mod backend;
pub mod config;
pub mod controller;
pub mod sessions;
pub mod web;

use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));
    let config = Config::read_or_create(&config_path)?;

    web::run(config).await
}
