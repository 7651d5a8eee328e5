use assetry_web::cmd::*;
use assetry_web::config::init_shared_app_state;
use assetry_web::error::AppError;
use assetry_web::{adapter, config, repo};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // step1. parse cli
    let cli = AssetryCli::parse();
    let config = config::parse_config(cli.command.config_path()).await?;
    // error level
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Some(tracing) = &config.tracing {
        for x in tracing.filter.split(',').filter(|x| !x.trim().is_empty()) {
            match x.trim().parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => eprintln!("ignore tracing directive {x}: {e}"),
            }
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
    // init state
    let state = init_shared_app_state(&config).await?;
    match cli.command {
        Commands::SyncSchema { .. } => repo::sync_schema(&state.conn).await?,
        Commands::Run { sync_schema, .. } => {
            if sync_schema {
                repo::sync_schema(&state.conn).await?;
            }
            // step2. start web
            adapter::http::server::start_http_server(&config, state).await?;
        }
    }
    Ok(())
}
