use vehicle_market::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config)?;

    tracing::info!(
        environment = %config.service.environment,
        production = config.is_production(),
        "Configuration loaded"
    );

    let state = AppState::new(config.clone());
    let app = router(state);

    Server::new(config).serve(app).await
}
