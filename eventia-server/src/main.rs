use eventia_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env, then configuration (logging settings included)
    setup_environment();
    let config = Config::from_env()?;

    // 2. logging
    config.init_logging();
    print_banner();
    tracing::info!("Eventia server starting...");
    config.log_warnings();

    // 3. database, migrations, first-run admin
    let state = ServerState::initialize(&config).await?;

    // 4. serve until ctrl-c
    let server = Server::new(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
