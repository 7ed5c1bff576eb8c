use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use minesweeper_core::DEFAULT_DURATION_SECONDS;

#[derive(Parser, Debug)]
#[command(name = "minesweeper-server")]
#[command(version, about = "HTTP API for turn-based Minesweeper games")]
pub struct Args {
    /// HTTP API listen address.
    #[arg(long, env = "MINESWEEPER_LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: String,

    /// Seconds a new game lasts when the request does not say.
    #[arg(long, env = "MINESWEEPER_DURATION_SECONDS", default_value_t = DEFAULT_DURATION_SECONDS)]
    pub duration_seconds: i32,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Args {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            default_duration_seconds: self.duration_seconds,
        }
    }

    /// Filter directive for the log subscriber, `RUST_LOG` takes precedence.
    pub fn log_directive(&self) -> String {
        self.verbose.log_level_filter().as_str().to_lowercase()
    }
}

/// Settings the request handlers need.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub default_duration_seconds: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }
}
