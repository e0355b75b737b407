use anyhow::Result;
use clap::{CommandFactory, Parser};
use signstream::app::{ReplayOptions, run_classify, run_replay, show_config};
use signstream::cli::{Cli, Commands, ConfigAction};
use signstream::config::Config;
use signstream::output::OutputStyle;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    tracing::debug!(version = %signstream::version_string(), "signstream starting");

    match cli.command {
        Commands::Classify {
            file,
            language,
            seed,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_classify(&config, &file, language, seed, output_style(json, false))?;
        }
        Commands::Replay {
            file,
            fps,
            language,
            sensitivity,
            interval,
            seed,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let options = ReplayOptions {
                file,
                fps,
                language,
                sensitivity,
                interval,
                seed,
            };
            run_replay(config, options, output_style(json, cli.quiet)).await?;
        }
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let config = load_config(cli.config.as_deref())?;
                show_config(&config)?;
            }
            ConfigAction::Path => {
                let path = cli.config.unwrap_or_else(Config::default_path);
                println!("{}", path.display());
            }
        },
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "signstream",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Install the tracing subscriber on stderr.
///
/// `RUST_LOG` wins; otherwise the level follows `-v`/`-q`.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("signstream={default_level}")));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn output_style(json: bool, sentences_only: bool) -> OutputStyle {
    OutputStyle {
        json,
        color: !json && std::io::stdout().is_terminal(),
        sentences_only,
    }
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/signstream/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}
