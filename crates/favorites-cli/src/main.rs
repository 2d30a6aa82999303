//! Favorites CLI: derive addresses, decode accounts, build instruction data,
//! and replay transition scripts against an in-memory ledger.
//! Prints one JSON object to stdout per command; logs go to stderr (RUST_LOG).

use std::{fs, path::PathBuf, str::FromStr, sync::Arc};

use anchor_lang::prelude::Pubkey;
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use favorites_core::{
    Address, AddressDeriver, ErrorKind, FavoritesConfig, FavoritesStateMachine, FieldUpdate,
    Identity, InMemoryAccountStore, Record, SolanaAddressSpace, Transition,
};

/// Defines the CLI and the selected subcommand.
#[derive(Parser, Debug)]
#[command(name = "favorites-cli")]
#[command(about = "Favorites PDA helper (derive decode ix replay)", long_about = None)]
struct Cli {
    /// JSON config file (program_id, namespace_tag, max_color_len).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Lists available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Derives the favorites PDA for an owner and prints JSON.
    Derive {
        #[arg(long)]
        owner: String,
        /// Overrides the configured program id.
        #[arg(long)]
        program_id: Option<String>,
    },
    /// Decodes base64 account data into a record and prints JSON.
    Decode {
        #[arg(long)]
        data: String,
    },
    /// Builds instruction data and prints it as base64 JSON.
    Ix {
        #[command(subcommand)]
        kind: IxKind,
    },
    /// Applies a JSON list of signed transitions to an empty in-memory ledger.
    Replay {
        #[arg(long)]
        script: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum IxKind {
    /// set_favorites(number, color)
    Create {
        #[arg(long)]
        number: u64,
        #[arg(long)]
        color: String,
    },
    /// update_favorites(Option<number>, Option<color>)
    Update {
        #[arg(long)]
        number: Option<u64>,
        #[arg(long)]
        color: Option<String>,
    },
}

/// Holds JSON output of derive.
#[derive(Serialize)]
struct OutDerive {
    address: String,
    bump: u8,
    namespace: String,
    program_id: String,
}

/// Holds JSON output of decode.
#[derive(Serialize)]
struct OutRecord {
    owner: String,
    number: u64,
    color: String,
}

impl From<&Record> for OutRecord {
    fn from(r: &Record) -> Self {
        Self { owner: b58(&r.owner), number: r.number, color: r.color.clone() }
    }
}

/// Holds JSON output of ix.
#[derive(Serialize)]
struct OutIx {
    instruction: &'static str,
    #[serde(rename = "dataB64")]
    data_b64: String,
    data_len: usize,
}

/// One replay step: a transition plus its signer.
#[derive(Deserialize)]
struct Step {
    signer: String,
    #[serde(flatten)]
    transition: ScriptTransition,
}

/// Script form of a transition; keys may be base58 or hex.
#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ScriptTransition {
    Create { owner: String, number: u64, color: String },
    Update { owner: String, number: Option<u64>, color: Option<String> },
}

/// Holds JSON output of one replay step.
#[derive(Serialize)]
struct OutStep {
    step: usize,
    instruction: &'static str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<OutRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Holds JSON output of replay.
#[derive(Serialize)]
struct OutReplay {
    steps: Vec<OutStep>,
    accounts: usize,
}

fn b58<K: Into<Pubkey> + Copy>(key: &K) -> String {
    (*key).into().to_string()
}

/// Parses a key given as base58 (Solana form) or 64 hex chars.
fn parse_key(s: &str) -> Result<[u8; 32]> {
    if s.len() == 64 {
        if let Ok(id) = Identity::from_str(s) {
            return Ok(id.to_bytes());
        }
    }
    Pubkey::from_str(s)
        .map(|pk| pk.to_bytes())
        .map_err(|_| anyhow!("invalid key {s:?}: expected base58 or 64 hex chars"))
}

fn load_config(path: Option<&PathBuf>) -> Result<FavoritesConfig> {
    let cfg = match path {
        Some(p) => {
            let raw = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", p.display()))?
        }
        None => FavoritesConfig::default(),
    };
    cfg.validate()?;
    debug!(?cfg, "loaded config");
    Ok(cfg)
}

fn replay(cfg: &FavoritesConfig, script: &PathBuf) -> Result<OutReplay> {
    let raw = fs::read_to_string(script).with_context(|| format!("reading {}", script.display()))?;
    let steps: Vec<Step> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", script.display()))?;

    let store = Arc::new(InMemoryAccountStore::new());
    let machine = FavoritesStateMachine::new(Arc::clone(&store), SolanaAddressSpace, cfg)?;

    let mut out = Vec::with_capacity(steps.len());
    for (i, step) in steps.into_iter().enumerate() {
        let signer = Identity::new(parse_key(&step.signer)?);
        let transition = match step.transition {
            ScriptTransition::Create { owner, number, color } => {
                Transition::Create { owner: Identity::new(parse_key(&owner)?), number, color }
            }
            ScriptTransition::Update { owner, number, color } => Transition::Update {
                owner: Identity::new(parse_key(&owner)?),
                number: FieldUpdate::from(number),
                color: FieldUpdate::from(color),
            },
        };
        let instruction = transition.name();
        let row = match machine.submit(transition, &signer) {
            Ok(receipt) => OutStep {
                step: i,
                instruction,
                ok: true,
                id: Some(receipt.id.to_string()),
                address: Some(b58(&receipt.address)),
                record: Some(OutRecord::from(&receipt.record)),
                error: None,
                message: None,
            },
            Err(e) => OutStep {
                step: i,
                instruction,
                ok: false,
                id: None,
                address: None,
                record: None,
                error: Some(e.kind()),
                message: Some(e.to_string()),
            },
        };
        out.push(row);
    }
    let accounts = store.len()?;
    info!(steps = out.len(), accounts, "replay finished");
    Ok(OutReplay { steps: out, accounts })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Parses flags and dispatches.
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Derive { owner, program_id } => {
            let mut cfg = cfg;
            if let Some(p) = program_id {
                cfg.program_id = Address::new(parse_key(&p)?);
            }
            let deriver = AddressDeriver::new(SolanaAddressSpace, &cfg);
            let derived = deriver.derive_for(&Identity::new(parse_key(&owner)?))?;
            let out = OutDerive {
                address: b58(&derived.address),
                bump: derived.bump,
                namespace: cfg.namespace_tag.clone(),
                program_id: b58(&cfg.program_id),
            };
            println!("{}", serde_json::to_string(&out)?);
        }
        Commands::Decode { data } => {
            let bytes = STANDARD.decode(data)?;
            let record = Record::decode(&bytes)?;
            println!("{}", serde_json::to_string(&OutRecord::from(&record))?);
        }
        Commands::Ix { kind } => {
            // Instruction data does not depend on the owner; any key will do.
            let owner = Identity::default();
            let transition = match kind {
                IxKind::Create { number, color } => Transition::Create { owner, number, color },
                IxKind::Update { number, color } => Transition::Update {
                    owner,
                    number: number.into(),
                    color: color.into(),
                },
            };
            let data = transition.instruction_data();
            let out = OutIx {
                instruction: transition.name(),
                data_b64: STANDARD.encode(&data),
                data_len: data.len(),
            };
            println!("{}", serde_json::to_string(&out)?);
        }
        Commands::Replay { script } => {
            let out = replay(&cfg, &script)?;
            println!("{}", serde_json::to_string(&out)?);
        }
    }

    Ok(())
}
