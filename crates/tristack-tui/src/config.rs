use clap::Parser;
use std::path::PathBuf;
use tristack_core::{Difficulty, SessionConfig};

/// Stack three grids to rebuild the target
#[derive(Debug, Parser)]
#[command(name = "tristack", version, about)]
pub struct Args {
    /// Start straight at a difficulty (easy, medium, hard)
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Sign in as this player instead of playing as a guest
    #[arg(short, long)]
    pub player: Option<String>,

    /// Load puzzles from a JSON catalog instead of the bundled set
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Directory for ledgers and the log file
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seed the puzzle picker (for reproducible runs)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Open the tutorial demo first
    #[arg(long)]
    pub tutorial: bool,

    /// Minutes of inactivity before a signed-in player is signed out
    #[arg(long, default_value_t = 30)]
    pub idle_timeout_mins: u64,
}

/// Environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local play - file-based ledger storage
    Local,
    /// Testing - in-memory ledgers
    Test,
}

impl Environment {
    /// Detect environment from TRISTACK_ENV variable
    pub fn detect() -> Self {
        Self::from_var(std::env::var("TRISTACK_ENV").ok().as_deref())
    }

    fn from_var(value: Option<&str>) -> Self {
        match value {
            Some("test") | Some("testing") => Environment::Test,
            _ => Environment::Local,
        }
    }
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub data_dir: PathBuf,
    pub catalog: Option<PathBuf>,
    pub player: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub seed: Option<u64>,
    pub tutorial: bool,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_args(args: Args) -> Self {
        let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
        Self {
            environment: Environment::detect(),
            data_dir,
            catalog: args.catalog,
            player: args.player,
            difficulty: args.difficulty,
            seed: args.seed,
            tutorial: args.tutorial,
            session: SessionConfig {
                inactivity_timeout_ms: args.idle_timeout_mins.saturating_mul(60_000),
            },
        }
    }

    /// Path of the log file
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("tristack.log")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tristack")
}
