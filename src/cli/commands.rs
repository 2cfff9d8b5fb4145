use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use validator::Validate;

use crate::cli::args::Cli;
use crate::error::Result;
use crate::server::{router, AppState};
use crate::settings::Settings;
use crate::store::FileStore;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(data_file) = cli.data_file {
        settings.data_file = data_file;
    }
    if let Some(static_dir) = cli.static_dir {
        settings.static_dir = static_dir;
    }
    settings.validate()?;

    let store = Arc::new(FileStore::new(settings.data_file.clone()));
    let state = AppState::new(store);
    let app = router(state, settings.static_dir.clone());

    let listener = tokio::net::TcpListener::bind(settings.bind_addr()).await?;
    info!(
        addr = %settings.bind_addr(),
        data_file = %settings.data_file.display(),
        "listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "emissions_monitor=debug,tower_http=debug"
    } else {
        "emissions_monitor=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}
