use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mobileguard::config::Config;
use mobileguard::error::GuardError;
use mobileguard::output::list_reports;
use mobileguard::pipeline::{find_packages, MAX_PACKAGES};
use mobileguard::rules::RiskTier;
use mobileguard::{AnalyzeOptions, Pipeline};

#[derive(Parser)]
#[command(
    name = "mobileguard",
    about = "Heuristic triage for Android APK files",
    version,
    author
)]
struct Cli {
    /// Verbose logging (same as MOBILEGUARD_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Config file path
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one APK and save reports
    Analyze {
        /// Path to the APK file
        path: PathBuf,

        /// Report formats, comma separated (json, csv, txt, html)
        #[arg(long, short = 'f', value_delimiter = ',')]
        format: Vec<String>,

        /// Directory for saved reports
        #[arg(long, short = 'o')]
        reports_dir: Option<PathBuf>,

        /// Precomputed facts JSON instead of running aapt
        #[arg(long)]
        facts: Option<PathBuf>,

        /// Print the full JSON report instead of the preview
        #[arg(long)]
        json: bool,
    },

    /// List APKs in directories with a quick risk tier
    Triage {
        /// Directories to search
        #[arg(default_value = ".")]
        dirs: Vec<PathBuf>,

        /// Exit with 1 when any package reaches this tier (low, medium, high)
        #[arg(long)]
        fail_on: Option<String>,
    },

    /// List saved reports, newest first
    Reports {
        /// Reports directory
        #[arg(long, short = 'o')]
        reports_dir: Option<PathBuf>,
    },

    /// Generate a starter .mobileguard.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            path,
            format,
            reports_dir,
            facts,
            json,
        } => cmd_analyze(path, cli.config, format, reports_dir, facts, json),
        Commands::Triage { dirs, fail_on } => cmd_triage(dirs, cli.config, fail_on),
        Commands::Reports { reports_dir } => cmd_reports(cli.config, reports_dir),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MOBILEGUARD_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_analyze(
    path: PathBuf,
    config: Option<PathBuf>,
    formats: Vec<String>,
    reports_dir: Option<PathBuf>,
    facts: Option<PathBuf>,
    json: bool,
) -> Result<i32, GuardError> {
    let options = AnalyzeOptions {
        config_path: config,
        facts_path: facts,
        formats: if formats.is_empty() { None } else { Some(formats) },
        reports_dir,
    };

    let outcome = mobileguard::analyze(&path, &options)?;

    if outcome.report.is_empty() {
        eprintln!("Report composition failed for {}", path.display());
        return Ok(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        print!("{}", mobileguard::preview_model(&outcome.report).render());
    }

    for (format, saved) in &outcome.saved {
        eprintln!("Saved {} report: {}", format, saved.display());
    }

    Ok(if outcome.report.security_assessment.risk_level == RiskTier::High {
        1
    } else {
        0
    })
}

fn cmd_triage(
    dirs: Vec<PathBuf>,
    config: Option<PathBuf>,
    fail_on: Option<String>,
) -> Result<i32, GuardError> {
    let fail_on = fail_on.and_then(|s| {
        let tier = RiskTier::from_str_lenient(&s);
        if tier.is_none() {
            eprintln!("Warning: unknown tier '{}', ignoring", s);
        }
        tier
    });

    let config = mobileguard::load_config(&AnalyzeOptions {
        config_path: config,
        ..Default::default()
    })?;
    let pipeline = Pipeline::select(&config, None);
    let packages = find_packages(&dirs, MAX_PACKAGES);

    if packages.is_empty() {
        println!("No APK files found.");
        return Ok(0);
    }

    println!("{:<8} {:>12}  {}", "RISK", "SIZE", "PATH");
    println!("{}", "-".repeat(80));

    let mut worst = RiskTier::Low;
    for path in &packages {
        let entry = pipeline.triage(path);
        worst = worst.max(entry.tier);
        println!(
            "{:<8} {:>12}  {}",
            entry.tier.to_string().to_uppercase(),
            entry.size_bytes,
            entry.path.display()
        );
    }
    println!("\n{} APK file(s) found.", packages.len());

    Ok(match fail_on {
        Some(threshold) if worst >= threshold => 1,
        _ => 0,
    })
}

fn cmd_reports(config: Option<PathBuf>, reports_dir: Option<PathBuf>) -> Result<i32, GuardError> {
    let config = mobileguard::load_config(&AnalyzeOptions {
        config_path: config,
        reports_dir,
        ..Default::default()
    })?;

    let reports = list_reports(&config.output.reports_dir);
    if reports.is_empty() {
        println!("No saved reports in {}", config.output.reports_dir.display());
        return Ok(0);
    }

    println!("{:<6} {:<20} {:>10}  {}", "FORMAT", "MODIFIED", "SIZE", "NAME");
    println!("{}", "-".repeat(80));
    for r in &reports {
        println!(
            "{:<6} {:<20} {:>10}  {}",
            r.format.to_string(),
            r.modified
                .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".into()),
            r.size,
            r.name,
        );
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, GuardError> {
    let path = PathBuf::from(".mobileguard.toml");

    if path.exists() && !force {
        eprintln!(".mobileguard.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .mobileguard.toml");

    Ok(0)
}
