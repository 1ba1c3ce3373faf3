// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `kubedeploy`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "kubedeploy",
    version,
    about = "Register Kubernetes cluster definitions and drive their provisioning playbooks.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the application config file (TOML).
    ///
    /// A missing file is fine: built-in defaults are used.
    #[arg(long, value_name = "PATH", default_value = "Kubedeploy.toml", global = true)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `KUBEDEPLOY_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// What to do. Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the web front end.
    Serve,

    /// Write config.yml and inventory.ini for the first cluster in a database.
    Generate {
        /// SQLite database holding the `clusters` table.
        #[arg(long, value_name = "PATH")]
        db: PathBuf,

        /// Output directory; defaults to `[artifacts].dir` from the config.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Rebuild inventory.ini from an existing config.yml.
    Inventory {
        #[arg(long, value_name = "PATH", default_value = "ansible/config.yml")]
        config_yml: PathBuf,

        #[arg(long, value_name = "PATH", default_value = "ansible/inventory.ini")]
        out: PathBuf,
    },

    /// Recreate a database containing a single demo cluster.
    SeedExample {
        #[arg(long, value_name = "PATH", default_value = "database/example.db")]
        db: PathBuf,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_implied_when_no_subcommand_given() {
        let args = CliArgs::try_parse_from(["kubedeploy", "--log-level", "debug"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.config, "Kubedeploy.toml");
    }

    #[test]
    fn generate_requires_db() {
        assert!(CliArgs::try_parse_from(["kubedeploy", "generate"]).is_err());

        let args =
            CliArgs::try_parse_from(["kubedeploy", "generate", "--db", "x.db"]).unwrap();
        match args.command {
            Some(Command::Generate { db, out }) => {
                assert_eq!(db, PathBuf::from("x.db"));
                assert!(out.is_none());
            }
            other => panic!("expected generate, got {other:?}"),
        }
    }
}
