use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use bf_cfg::SettingSet;
use bf_loader::{LoadCache, PrettyNode, settings};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Reads build files and reports what they declare.
#[derive(Debug, Parser)]
#[command(name = "bf", version)]
struct Args {
    /// Override a setting, e.g. `--set strict_blocks=true`.
    #[arg(long = "set", value_name = "NAME=VALUE", global = true)]
    overrides: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load build files and report any problems.
    Check {
        /// Build files, or directories containing one.
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
    },
    /// Print everything a build file declares.
    Dump {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Print a build file in canonical form.
    Fmt {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// List all settings and their current values.
    Settings,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(!bf_ore::env::is_truthy("NO_COLOR"))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = settings::default_settings();
    for pair in &args.overrides {
        settings
            .try_update_pair(pair)
            .with_context(|| format!("invalid --set {pair:?}"))?;
    }

    match args.command {
        Command::Check { paths } => check(&paths, &settings),
        Command::Dump { path } => {
            let loaded = bf_loader::load_file(&path, &settings)?;
            for warning in &loaded.warnings {
                eprintln!("warning: {warning}");
            }
            let title = bf_loader::resolve_build_file(&path, &settings)
                .display()
                .to_string();
            print!("{}", PrettyNode::from_config(title, &loaded.config));
            Ok(ExitCode::SUCCESS)
        }
        Command::Fmt { path } => {
            let loaded = bf_loader::load_file(&path, &settings)?;
            print!("{}", bf_loader::to_source(&loaded.config));
            Ok(ExitCode::SUCCESS)
        }
        Command::Settings => {
            print!("{settings}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(paths: &[PathBuf], settings: &SettingSet) -> anyhow::Result<ExitCode> {
    let mut cache = LoadCache::new(settings.clone());
    let mut failed = 0;

    for path in paths {
        let path = bf_loader::resolve_build_file(path, settings);
        match cache.load_file(&path) {
            Ok(loaded) => {
                for warning in &loaded.warnings {
                    eprintln!("{}: warning: {warning}", path.display());
                }
                println!(
                    "{}: ok ({} plugins, {} repositories, {} dependencies, {} tasks)",
                    path.display(),
                    loaded.config.plugins().len(),
                    loaded.config.repositories().len(),
                    loaded.config.dependencies().len(),
                    loaded.config.tasks().len(),
                );
            }
            Err(err) => {
                eprintln!("{err}");
                failed += 1;
            }
        }
    }

    tracing::debug!(files = paths.len(), failed, cached = cache.len(), "check finished");
    if failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
