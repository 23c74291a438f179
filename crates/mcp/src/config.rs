#![forbid(unsafe_code)]

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gl_mcp", version)]
#[command(about = "GameLab code history and mission server (JSON-RPC over stdio)")]
#[command(
    after_help = "Environment:\n  GAMELAB_LOG   Log filter (tracing EnvFilter syntax, default: info)"
)]
pub(crate) struct Config {
    /// Directory holding the SQLite store.
    #[arg(long, env = "GAMELAB_STORAGE_DIR", default_value = ".gamelab")]
    pub(crate) storage_dir: PathBuf,

    /// Skip installing the bundled games and missions into an empty store.
    #[arg(long, env = "GAMELAB_NO_SEED", default_value_t = false)]
    pub(crate) no_seed: bool,

    /// Page size for get_history when the caller passes no limit.
    #[arg(long, env = "GAMELAB_HISTORY_LIMIT", default_value_t = 100)]
    pub(crate) history_limit: usize,

    /// Emit logs as JSON lines.
    #[arg(long, env = "GAMELAB_LOG_JSON", default_value_t = false)]
    pub(crate) log_json: bool,
}
