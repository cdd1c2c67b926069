//! Aura oracle CLI
//!
//! Scores a Farcaster account and prints the `pushAura` transaction for the
//! vault's oracle. Signing and submission are left to an external signer.
//!
//! ```text
//! aura-oracle --vault 0x... --username dwr
//! aura-oracle --fid 3 --mock --dry-run
//! ```

use anyhow::{Context, Result};
use auravault_common::{parse_address, Address, Fid};
use auravault_scorer::{
    AuraPipeline, AuraUpdate, Identity, OracleConfig, ScoreOutcome, ScoreRequest,
    PUSH_AURA_SIGNATURE,
};
use clap::{ArgGroup, Parser};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compute a creator's aura and prepare the oracle update
#[derive(Parser, Debug)]
#[command(name = "aura-oracle", version)]
#[command(group(ArgGroup::new("identity").required(true).args(["fid", "username"])))]
struct Cli {
    /// Vault whose aura is updated
    #[arg(long, required_unless_present = "dry_run", value_parser = parse_vault)]
    vault: Option<Address>,

    /// Farcaster ID to score
    #[arg(long)]
    fid: Option<Fid>,

    /// Farcaster username to score
    #[arg(long)]
    username: Option<String>,

    /// Use fixed mock data instead of Neynar and Pinata
    #[arg(long)]
    mock: bool,

    /// Compute and print, but do not emit a transaction
    #[arg(long)]
    dry_run: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn identity(&self) -> Identity {
        match (&self.username, self.fid) {
            (Some(username), _) => Identity::Username(username.clone()),
            (None, Some(fid)) => Identity::Fid(fid),
            // clap enforces exactly one of the two
            (None, None) => Identity::Username(String::new()),
        }
    }

    fn request(&self) -> ScoreRequest {
        ScoreRequest {
            identity: self.identity(),
            vault: self.vault,
        }
    }
}

fn parse_vault(s: &str) -> std::result::Result<Address, String> {
    parse_address(s).map_err(|e| e.to_string())
}

/// Unsigned transaction for the external signer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingTransaction<'a> {
    to: Option<&'a str>,
    function: &'static str,
    args: &'a AuraUpdate,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    #[serde(flatten)]
    outcome: &'a ScoreOutcome,
    mock: bool,
    dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction: Option<PendingTransaction<'a>>,
}

/// Mock scores are never published from a production deployment
fn withholds_mock_update(cli: &Cli, config: &OracleConfig) -> bool {
    cli.mock && config.is_production()
}

fn build_report<'a>(
    cli: &Cli,
    config: &'a OracleConfig,
    outcome: &'a ScoreOutcome,
) -> Report<'a> {
    let emit = !cli.dry_run && !withholds_mock_update(cli, config);
    let transaction = match (&outcome.update, emit) {
        (Some(update), true) => Some(PendingTransaction {
            to: config.oracle_contract.as_deref(),
            function: PUSH_AURA_SIGNATURE,
            args: update,
            data: update.calldata_hex(),
        }),
        _ => None,
    };

    Report {
        outcome,
        mock: cli.mock,
        dry_run: cli.dry_run,
        transaction,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let config = OracleConfig::load().context("loading oracle configuration")?;
    info!(
        environment = %config.environment,
        mock = cli.mock,
        dry_run = cli.dry_run,
        "Starting aura oracle"
    );

    let pipeline = if cli.mock {
        AuraPipeline::mock()
    } else {
        AuraPipeline::from_config(&config)?
    };

    let request = cli.request();
    let outcome = pipeline
        .run(&request)
        .await
        .with_context(|| format!("scoring {}", request.identity))?;

    if cli.dry_run {
        info!(aura = outcome.aura.value(), "Dry run, no transaction emitted");
    } else if withholds_mock_update(&cli, &config) {
        warn!("Mock score in production, no transaction emitted");
    } else if outcome.update.is_some() && config.oracle_contract.is_none() {
        warn!("AURA_ORACLE_ADDRESS not set, transaction has no recipient");
    }

    let report = build_report(&cli, &config, &outcome);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
