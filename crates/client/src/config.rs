//! Client configuration read from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use runtime::RuntimeConfig;

/// Client configuration.
///
/// Everything is optional; an empty environment plays the built-in campaign
/// with automatic reward finalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Directory holding `compositions.ron`, `levels.ron` and `config.toml`.
    /// `None` uses the built-in content.
    pub data_dir: Option<PathBuf>,
    /// Delay before a produced target is finalized. `None` means the player
    /// finalizes with `done`.
    pub reward_delay: Option<Duration>,
    pub auto_advance: bool,
    pub session_id: Option<String>,
    /// Overrides the platform cache directory for log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            reward_delay: Some(Duration::from_millis(Self::DEFAULT_REWARD_DELAY_MS)),
            auto_advance: true,
            session_id: None,
            log_dir: None,
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_REWARD_DELAY_MS: u64 = 400;

    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `GLYPH_DATA_DIR` - Content directory (default: built-in campaign)
    /// - `GLYPH_REWARD_DELAY_MS` - Reward animation delay, `0` for manual (default: 400)
    /// - `GLYPH_AUTO_ADVANCE` - Load the next level on completion (default: true)
    /// - `GLYPH_SESSION_ID` - Log session name (default: timestamp)
    /// - `GLYPH_LOG_DIR` - Log root directory (default: platform cache dir)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.data_dir = lookup("GLYPH_DATA_DIR").map(PathBuf::from);

        if let Some(delay_ms) = parse::<u64>(lookup("GLYPH_REWARD_DELAY_MS")) {
            config.reward_delay = (delay_ms > 0).then(|| Duration::from_millis(delay_ms));
        }

        if let Some(auto_advance) = parse::<bool>(lookup("GLYPH_AUTO_ADVANCE")) {
            config.auto_advance = auto_advance;
        }

        config.session_id = lookup("GLYPH_SESSION_ID").filter(|id| !id.is_empty());
        config.log_dir = lookup("GLYPH_LOG_DIR").map(PathBuf::from);

        config
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            reward_delay: self.reward_delay,
            auto_advance: self.auto_advance,
            ..RuntimeConfig::default()
        }
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config(&[]), ClientConfig::default());
    }

    #[test]
    fn zero_delay_means_manual_finalization() {
        let config = config(&[("GLYPH_REWARD_DELAY_MS", "0")]);
        assert_eq!(config.reward_delay, None);
        assert_eq!(config.runtime_config().reward_delay, None);
    }

    #[test]
    fn reads_all_variables() {
        let config = config(&[
            ("GLYPH_DATA_DIR", "/srv/glyph"),
            ("GLYPH_REWARD_DELAY_MS", "50"),
            ("GLYPH_AUTO_ADVANCE", "false"),
            ("GLYPH_SESSION_ID", "run-1"),
            ("GLYPH_LOG_DIR", "/tmp/logs"),
        ]);

        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/glyph")));
        assert_eq!(config.reward_delay, Some(Duration::from_millis(50)));
        assert!(!config.auto_advance);
        assert_eq!(config.session_id.as_deref(), Some("run-1"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn malformed_values_are_ignored() {
        let config = config(&[("GLYPH_AUTO_ADVANCE", "maybe"), ("GLYPH_REWARD_DELAY_MS", "soon")]);
        assert!(config.auto_advance);
        assert_eq!(
            config.reward_delay,
            Some(Duration::from_millis(ClientConfig::DEFAULT_REWARD_DELAY_MS))
        );
    }
}
