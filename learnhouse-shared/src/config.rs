/// General application settings consumed by the install service
///
/// The API server loads these from the environment and hands them to the
/// install gate explicitly; nothing here reads global state.
use serde::{Deserialize, Serialize};

/// General (non-infrastructure) settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Development mode relaxes CORS and enables verbose logging
    pub development_mode: bool,

    /// Whether the install wizard endpoints are reachable
    ///
    /// Must be switched off once the instance is provisioned.
    pub install_mode: bool,
}

impl GeneralConfig {
    /// Config with install mode switched on
    pub fn installing() -> Self {
        Self {
            development_mode: false,
            install_mode: true,
        }
    }
}

/// Parses a boolean flag the way environment variables are usually written
///
/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitively.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_installing() {
        let config = GeneralConfig::default();
        assert!(!config.install_mode);
        assert!(!config.development_mode);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
