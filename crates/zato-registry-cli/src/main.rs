use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use zato_registry_core::{
    ChannelRegistry, Config, Credentials, RegistryError, RestoreReport, RestoreSource, Result,
};

mod args;
use args::{Cli, Commands, ConfigAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);

    let result = match cli.command {
        Some(Commands::Backup {
            address,
            credentials,
            to_file,
        }) => handle_backup(&base_dir, &address, &credentials, to_file),
        Some(Commands::Restore {
            address,
            credentials,
            from_file,
        }) => handle_restore(&base_dir, &address, &credentials, &from_file),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// `RUST_LOG` wins; otherwise the verbosity flags pick the level.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn default_log_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "zato-connection-registry", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("ZATO_REGISTRY_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".zato-registry"))
        .unwrap_or_else(|| PathBuf::from(".zato-registry"))
}

fn default_backup_path() -> PathBuf {
    PathBuf::from(format!(
        "zato-channels-{}.json",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ))
}

fn handle_backup(
    base_dir: &Path,
    address: &str,
    credentials: &str,
    to_file: Option<PathBuf>,
) -> Result<()> {
    let credentials = Credentials::parse(credentials)?;
    let config = Config::load(base_dir)?;
    let to_file = to_file.unwrap_or_else(default_backup_path);

    let mut registry = ChannelRegistry::from_config(address, credentials, &config.remote);
    registry.dump_to_file(&to_file)?;

    println!(
        "{} {} channel(s) saved.",
        "Backup completed.".green(),
        registry.channels().len()
    );
    println!("See {}.", to_file.display());
    Ok(())
}

fn handle_restore(
    base_dir: &Path,
    address: &str,
    credentials: &str,
    from_file: &Path,
) -> Result<()> {
    let credentials = Credentials::parse(credentials)?;
    let config = Config::load(base_dir)?;

    let registry = ChannelRegistry::from_config(address, credentials, &config.remote);
    let report = registry.restore_channels(RestoreSource::File(from_file))?;

    print_report(&report);
    println!(
        "{} See {}",
        "Restore completed.".green(),
        from_file.display()
    );
    Ok(())
}

fn print_report(report: &RestoreReport) {
    println!();
    println!("  {} {}", "Created:".green(), report.created);
    println!("  {} {}", "Already defined:".cyan(), report.already_defined);
    if !report.rejected.is_empty() {
        println!("  {} {}", "Rejected:".yellow(), report.rejected.len());
        for (name, message) in &report.rejected {
            println!("    {} {}", name.yellow(), message);
        }
    }
    println!();
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(RegistryError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
