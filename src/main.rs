use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use websupport_solver::config::Settings;
use websupport_solver::secrets::CredentialStore;
use websupport_solver::solver::{ChallengeRequest, Solver, SolverConfig, WebsupportSolver};

#[derive(Parser)]
#[command(name = "websupport-solver")]
#[command(about = "ACME DNS-01 challenge solver for the Websupport DNS API")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a challenge TXT record
    Present {
        /// Fully-qualified challenge domain (e.g. _acme-challenge.example.com.)
        #[arg(long)]
        fqdn: String,
        /// Challenge key to publish
        #[arg(long)]
        key: String,
        /// Stored credentials to use
        #[arg(long, default_value = "default")]
        secret_name: String,
    },

    /// Remove the TXT record carrying a challenge key
    CleanUp {
        #[arg(long)]
        fqdn: String,
        #[arg(long)]
        key: String,
        #[arg(long, default_value = "default")]
        secret_name: String,
    },

    /// List the records of a zone
    Records {
        /// Zone root (e.g. example.com)
        zone: String,
        #[arg(long, default_value = "default")]
        secret_name: String,
    },

    /// Store Websupport API credentials under a name
    SetKey {
        /// Credential entry name
        name: String,
    },

    /// Delete stored Websupport API credentials
    DeleteKey {
        /// Credential entry name
        name: String,
    },

    /// Show configuration file location and contents
    Config,
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Settings::config_path);

    let settings = Settings::load_from(&config_path);

    let log_level = settings
        .as_ref()
        .map(|s| s.solver.log_level.as_str())
        .unwrap_or("info");
    init_logging(log_level);

    match cli.command {
        Commands::Present {
            fqdn,
            key,
            secret_name,
        } => {
            let settings = settings?;
            let solver = WebsupportSolver::from_settings(&settings);
            info!(
                "Solver {} ({}) presenting challenge",
                solver.name(),
                settings.solver.group_name
            );
            solver
                .present(&challenge(fqdn, key, &secret_name))
                .await?;
            println!("Challenge record present");
        }

        Commands::CleanUp {
            fqdn,
            key,
            secret_name,
        } => {
            let settings = settings?;
            let solver = WebsupportSolver::from_settings(&settings);
            info!(
                "Solver {} ({}) cleaning up challenge",
                solver.name(),
                settings.solver.group_name
            );
            solver
                .clean_up(&challenge(fqdn, key, &secret_name))
                .await?;
            println!("Challenge record removed");
        }

        Commands::Records { zone, secret_name } => {
            let settings = settings?;
            let client = WebsupportSolver::from_settings(&settings)
                .client(&SolverConfig::with_secret_ref(&secret_name))?;

            for record in client.get_records(&zone).await? {
                println!(
                    "{:>10}  {:<6} {:<30} {:>6}  {}",
                    record.id, record.record_type, record.name, record.ttl, record.content
                );
            }
        }

        Commands::SetKey { name } => {
            use std::io::{self, Write};

            let store = credential_store(settings.ok());

            print!("API Key: ");
            io::stdout().flush()?;
            let mut key = String::new();
            io::stdin().read_line(&mut key)?;
            let key = key.trim();

            let secret = rpassword::prompt_password("API Secret: ")?;

            store.store(&name, key, &secret)?;
            println!("Credentials stored as: {}", name);
        }

        Commands::DeleteKey { name } => {
            credential_store(settings.ok()).delete(&name)?;
            println!("Credentials deleted: {}", name);
        }

        Commands::Config => {
            show_config(&config_path, settings.ok())?;
        }
    }

    Ok(())
}

fn challenge(fqdn: String, key: String, secret_name: &str) -> ChallengeRequest {
    ChallengeRequest {
        resolved_fqdn: fqdn,
        key,
        config: SolverConfig::with_secret_ref(secret_name),
    }
}

fn credential_store(settings: Option<Settings>) -> CredentialStore {
    match settings {
        Some(s) => CredentialStore::new(s.solver.credentials_path),
        None => CredentialStore::new(Settings::config_dir().join("credentials.toml")),
    }
}

fn show_config(config_path: &Path, settings: Option<Settings>) -> Result<()> {
    println!("Configuration file location: {}\n", config_path.display());

    match settings {
        Some(s) => {
            println!("Current configuration:\n");
            println!("{}", toml::to_string_pretty(&s)?);
        }
        None => {
            println!("Configuration file not found or invalid.");
            println!("\nCreate a configuration file at the location above.");
            println!("Example configuration:\n");
            println!(
                r#"[solver]
group_name = "acme.example.com"
log_level = "info"

[api]
timeout_seconds = 10
ttl = 600
"#
            );
        }
    }

    Ok(())
}
