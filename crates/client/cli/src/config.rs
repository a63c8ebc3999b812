//! CLI runtime configuration.
use std::env;
use std::path::PathBuf;

use playground_core::GameConfig;

/// Configuration for a terminal session.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub game: GameConfig,
    /// Directory of custom blueprint JSON files. Bundled blueprints are used
    /// when unset.
    pub blueprint_dir: Option<PathBuf>,
    /// Root directory for session logs. Platform cache directory when unset.
    pub log_dir: Option<PathBuf>,
    pub session_id: Option<String>,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PLAYGROUND_BOARD_WIDTH` - Board width in squares (default: 8)
    /// - `PLAYGROUND_BOARD_HEIGHT` - Board height in squares (default: 8)
    /// - `PLAYGROUND_BLUEPRINT_DIR` - Directory of blueprint JSON files
    /// - `PLAYGROUND_LOG_DIR` - Directory for session logs
    /// - `PLAYGROUND_SESSION_ID` - Session identifier (default: timestamp)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unparsable values fall
    /// back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        let width = read_var::<u32>(&lookup, "PLAYGROUND_BOARD_WIDTH");
        let height = read_var::<u32>(&lookup, "PLAYGROUND_BOARD_HEIGHT");
        if width.is_some() || height.is_some() {
            config.game = config.game.with_board_size(
                width.unwrap_or(GameConfig::DEFAULT_BOARD_WIDTH).max(1),
                height.unwrap_or(GameConfig::DEFAULT_BOARD_HEIGHT).max(1),
            );
        }

        config.blueprint_dir = non_empty(&lookup, "PLAYGROUND_BLUEPRINT_DIR").map(PathBuf::from);
        config.log_dir = non_empty(&lookup, "PLAYGROUND_LOG_DIR").map(PathBuf::from);
        config.session_id = non_empty(&lookup, "PLAYGROUND_SESSION_ID");

        config
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}
