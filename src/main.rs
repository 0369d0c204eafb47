use std::sync::Arc;

use lobbyserver::config::Config;
use lobbyserver::server;
use lobbyserver::service::LobbyService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging()?;

    let config = Arc::new(Config::default());
    let service = Arc::new(LobbyService::new(config.clone()));

    server::run(service, config).await?;

    Ok(())
}

fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Utc::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .chain(fern::log_file("lobbyserver.log")?)
        .apply()?;
    Ok(())
}
