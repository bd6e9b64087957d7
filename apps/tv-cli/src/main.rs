use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tv_app::{AppResult, CycleOutcome, config_service, run_service};

#[derive(Parser)]
#[command(name = "thermovolt")]
#[command(about = "Thermovolt - CPU temperature driven regulator voltage control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the control loop
    Run {
        /// Path to a YAML or JSON config file (built-in defaults if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Emit one JSON object per cycle instead of a status line
        #[arg(long)]
        json: bool,
        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<u64>,
    },
    /// Validate a config file
    Validate {
        /// Path to the config file
        config_path: PathBuf,
    },
    /// Print the built-in default config as YAML, or write it to a file
    DefaultConfig {
        /// Output path; `.json` writes JSON, anything else YAML
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List serial ports present on this machine
    Ports,
    /// Try each configured port once and report which one answers
    Probe {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Read the current log sample and show the controller's first step
    Sample {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            json,
            cycles,
        } => cmd_run(config.as_deref(), json, cycles),
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::DefaultConfig { output } => cmd_default_config(output.as_deref()),
        Commands::Ports => cmd_ports(),
        Commands::Probe { config } => cmd_probe(config.as_deref()),
        Commands::Sample { config, json } => cmd_sample(config.as_deref(), json),
    }
}

fn cmd_run(config_path: Option<&Path>, json: bool, cycles: Option<u64>) -> AppResult<()> {
    let config = config_service::resolve_config(config_path)?;
    let mut control = run_service::build_loop(&config)?;

    let stats = control.run(cycles, |outcome| {
        if json {
            match serde_json::to_string(outcome) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "could not encode cycle"),
            }
        } else {
            print_status(outcome);
        }
    });

    println!(
        "✓ {} cycles ({} applied, {} skipped, {} write failures)",
        stats.cycles, stats.applied, stats.skipped, stats.write_failures
    );
    Ok(())
}

fn print_status(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Applied(_) => println!("{}", outcome.status_line()),
        _ => eprintln!("{}", outcome.status_line()),
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = config_service::load_config(config_path)?;
    tv_app::assemble(&config)?;
    println!("✓ Config is valid");
    Ok(())
}

fn cmd_default_config(output: Option<&Path>) -> AppResult<()> {
    match output {
        Some(path) => {
            config_service::save_config(path, &tv_config::ThermovoltConfig::default())?;
            println!("✓ Wrote default config to {}", path.display());
        }
        None => print!("{}", config_service::default_config_yaml()?),
    }
    Ok(())
}

fn cmd_ports() -> AppResult<()> {
    let ports = tv_link::list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
    } else {
        println!("Serial ports:");
        for port in ports {
            println!("  {}", port);
        }
    }
    Ok(())
}

fn cmd_probe(config_path: Option<&Path>) -> AppResult<()> {
    let config = config_service::resolve_config(config_path)?;
    println!(
        "Probing {} port(s) for slave {}",
        config.actuator.ports.len(),
        config.actuator.slave_address
    );
    let endpoint = run_service::probe_link(&config)?;
    println!("✓ Regulator answered on {}", endpoint);
    Ok(())
}

fn cmd_sample(config_path: Option<&Path>, json: bool) -> AppResult<()> {
    let config = config_service::resolve_config(config_path)?;
    let preview = run_service::preview_sample(&config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        println!("Log: {} (modified {})", preview.path.display(), preview.modified);
        println!("{}", preview.report.status_line());
    }
    Ok(())
}
