/// Install-mode gate
///
/// Every install operation is refused once the instance has been
/// provisioned and install mode switched off.
use crate::config::GeneralConfig;
use crate::error::{InstallError, InstallResult};
use tracing::warn;

/// Message returned when install mode is off
pub const INSTALL_MODE_DISABLED: &str = "Install mode is not enabled";

/// Fails with [`InstallError::Forbidden`] unless install mode is on
pub fn ensure_install_mode_enabled(config: &GeneralConfig) -> InstallResult<()> {
    if config.install_mode {
        Ok(())
    } else {
        warn!("Install operation rejected: install mode is disabled");
        Err(InstallError::Forbidden(INSTALL_MODE_DISABLED.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_open_in_install_mode() {
        assert!(ensure_install_mode_enabled(&GeneralConfig::installing()).is_ok());
    }

    #[test]
    fn test_gate_closed_otherwise() {
        let configs = [
            GeneralConfig::default(),
            GeneralConfig {
                development_mode: true,
                install_mode: false,
            },
        ];

        for config in &configs {
            let err = ensure_install_mode_enabled(config).unwrap_err();
            assert!(matches!(err, InstallError::Forbidden(ref m) if m == INSTALL_MODE_DISABLED));
        }
    }
}
