//! cmd

use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct AssetryCli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Parser)]
pub enum Commands {
    #[command(name = "run", about = "start the inventory http server")]
    Run {
        #[arg(long, short, value_parser = verify_input_file, default_value = "config.toml", action=ArgAction::Set)]
        config: PathBuf,
        /// create missing tables before serving
        #[arg(long, default_value_t = false)]
        sync_schema: bool,
    },
    #[command(name = "sync-schema", about = "create missing tables and exit")]
    SyncSchema {
        #[arg(long, short, value_parser = verify_input_file, default_value = "config.toml", action=ArgAction::Set)]
        config: PathBuf,
    },
}

impl Commands {
    pub fn config_path(&self) -> &PathBuf {
        match self {
            Commands::Run { config, .. } | Commands::SyncSchema { config } => config,
        }
    }
}

// 配置文件校验
fn verify_input_file(input: &str) -> anyhow::Result<PathBuf> {
    let pb = PathBuf::from(input);
    if pb.exists() {
        anyhow::Ok(pb)
    } else {
        anyhow::bail!("config file {input} does not exist")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_is_rejected() {
        let res = AssetryCli::try_parse_from(["assetry-web", "run", "--config", "/nope/none.toml"]);
        assert!(res.is_err());
    }

    #[test]
    fn sync_schema_parses() {
        let cli = AssetryCli::try_parse_from(["assetry-web", "sync-schema", "-c", "Cargo.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::SyncSchema { .. }));
        assert_eq!(cli.command.config_path(), &PathBuf::from("Cargo.toml"));
    }
}
