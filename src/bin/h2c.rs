//! h2c CLI - download h2c-core and helmfile2compose extensions
//!
//! Usage:
//!   h2c                              Install core (+ depends from config)
//!   h2c keycloak                     Install core + keycloak extension
//!   h2c keycloak==0.1.0              Pin extension version
//!   h2c --core-version v2.0.0        Pin core version
//!   h2c -d ./tools keycloak          Custom install dir
//!   h2c --no-reinstall               Reuse cached .h2c/ files
//!   h2c --info [EXTENSION...]        Show extension info
//!   h2c run -e compose               Install, then run helmfile2compose

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use h2c_manager::config::{CONFIG_FILE, Config};
use h2c_manager::github::GithubClient;
use h2c_manager::install::InstallOptions;
use h2c_manager::{info, install, output, run};

#[derive(Parser)]
#[command(name = "h2c")]
#[command(about = "Download h2c-core and helmfile2compose extensions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Extension to install (e.g. 'keycloak', 'keycloak==0.1.0')
    #[arg(value_name = "EXTENSION")]
    extensions: Vec<String>,

    /// Pin h2c-core to a specific version tag (e.g. v2.0.0)
    #[arg(long, global = true, value_name = "TAG")]
    core_version: Option<String>,

    /// Install directory
    #[arg(short = 'd', long = "dir", env = "H2C_DIR", default_value = ".h2c")]
    dir: PathBuf,

    /// Skip download and reuse cached install directory
    #[arg(long, global = true)]
    no_reinstall: bool,

    /// Bypass incompatibility checks for these extensions
    #[arg(long, global = true, value_name = "EXT", num_args = 1..)]
    ignore_compatibility_errors: Vec<String>,

    /// Show extension info instead of installing
    #[arg(long)]
    info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install into .h2c, then run helmfile2compose with smart defaults
    Run {
        /// Arguments passed through to helmfile2compose
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    match try_main(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            output::error(&format!("{err:#}"));
            std::process::exit(1);
        }
    }
}

fn try_main(cli: Cli) -> Result<i32> {
    let client = GithubClient::new();
    let ignored: HashSet<String> = cli.ignore_compatibility_errors.into_iter().collect();

    if let Some(Commands::Run { args }) = cli.command {
        let opts = run::RunOptions {
            no_reinstall: cli.no_reinstall,
            core_version: cli.core_version,
            ignored,
        };
        return run::run(&args, &opts, &client);
    }

    if cli.info {
        let mut names = cli.extensions;
        if names.is_empty() {
            names = Config::load(CONFIG_FILE)?.depends;
        }
        info::show(&names, &client)?;
        return Ok(0);
    }

    install::install(
        &InstallOptions {
            core_version: cli.core_version,
            extensions: (!cli.extensions.is_empty()).then_some(cli.extensions),
            install_dir: cli.dir,
            no_reinstall: cli.no_reinstall,
            ignored,
        },
        &client,
    )?;
    Ok(0)
}
