pub mod api;
pub mod assets;
pub mod config;
pub mod store;

use tracing::info;

/// Load configuration, open the stores and serve the API until the process
/// is stopped.
pub async fn run() -> anyhow::Result<()> {
    // load .env for local development (if present)
    dotenvy::dotenv().ok();

    let config = config::Config::from_env()?;
    let validation = config.validate();
    validation.print_summary();
    if !validation.valid {
        anyhow::bail!("configuration invalid, refusing to start");
    }

    let assets = assets::AssetStore::new(config.upload_dir.clone())?;
    let store = store::create_store(
        config.store_mode.clone(),
        config.data_path.clone(),
        assets.clone(),
    );

    let router = api::router(store, assets, &config.public_dir);

    info!("API server listening on {}", config.api_addr);
    axum::Server::bind(&config.api_addr)
        .serve(router.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
