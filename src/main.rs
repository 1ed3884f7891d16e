mod balance_service;
mod calendar;
mod config;
mod day_detail;
mod hr_api;
mod leave_balance;
mod render;
mod server;
mod validate;

use config::AppConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!(
        "hr-dashboard starting, upstream {} on port {}",
        config.api.base_url,
        config.port
    );

    server::run(config).await;
}
