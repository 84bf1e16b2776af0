use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;

/// One-shot Vault login: fetch a client token and hand it to a configured
/// output.
///
/// Every setting is read from a `VAULT_LOGIN_`-prefixed environment
/// variable and can be overridden by the equivalently-named flag; flags
/// win when both are present.
#[derive(Parser, Debug, Clone)]
#[command(name = "vault-login", version, about)]
pub struct Settings {
    /// Address of the Vault server.
    #[arg(long, env = "VAULT_ADDR", default_value = "http://127.0.0.1:8200")]
    pub vault_addr: String,

    /// Type of the authentication ("kubernetes" or "approle").
    #[arg(long, env = "VAULT_LOGIN_AUTH_TYPE")]
    pub auth_type: Option<String>,

    /// Role for authentication.
    #[arg(long, env = "VAULT_LOGIN_AUTH_ROLE")]
    pub auth_role: Option<String>,

    /// Mount point for authentication.
    #[arg(long, env = "VAULT_LOGIN_AUTH_MOUNT")]
    pub auth_mount: Option<String>,

    /// Approle Secret ID for authentication.
    #[arg(long, env = "VAULT_LOGIN_AUTH_APPROLE_SECRET_ID")]
    pub auth_approle_secret_id: Option<String>,

    /// Approle Secret ID file for authentication.
    #[arg(long, env = "VAULT_LOGIN_AUTH_APPROLE_SECRET_ID_FILE")]
    pub auth_approle_secret_id_file: Option<String>,

    /// Type of output ("stdout", "file" or "kubernetes-secret").
    #[arg(long, env = "VAULT_LOGIN_OUTPUT_TYPE")]
    pub output_type: Option<String>,

    /// Output secret name; the target path for the file output.
    #[arg(long, env = "VAULT_LOGIN_OUTPUT_SECRET_NAME")]
    pub output_secret_name: Option<String>,

    /// Output secret namespace.
    #[arg(long, env = "VAULT_LOGIN_OUTPUT_SECRET_NAMESPACE")]
    pub output_secret_namespace: Option<String>,

    /// Output secret key.
    #[arg(long, env = "VAULT_LOGIN_OUTPUT_SECRET_KEY")]
    pub output_secret_key: Option<String>,

    /// Deadline for the whole retrieve-and-deliver run, in seconds.
    #[arg(long, env = "VAULT_LOGIN_TIMEOUT_SECONDS", default_value_t = 15)]
    pub timeout_seconds: u64,
}

impl Settings {
    /// Check the required fields, collecting every violation instead of
    /// stopping at the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if blank(&self.auth_type) {
            violations.push("no vault auth type provided".to_string());
        }
        if blank(&self.auth_role) {
            violations.push("no vault role provided".to_string());
        }
        if blank(&self.output_type) {
            violations.push("no output type provided".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::new(violations))
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_addr: "http://127.0.0.1:8200".to_string(),
            auth_type: None,
            auth_role: None,
            auth_mount: None,
            auth_approle_secret_id: None,
            auth_approle_secret_id_file: None,
            output_type: None,
            output_secret_name: None,
            output_secret_namespace: None,
            output_secret_key: None,
            timeout_seconds: 15,
        }
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_every_missing_field() {
        let settings = Settings::default();
        let err = settings.validate().unwrap_err();

        assert_eq!(err.violations().len(), 3);
        let rendered = err.to_string();
        assert!(rendered.contains("no vault auth type provided"));
        assert!(rendered.contains("no vault role provided"));
        assert!(rendered.contains("no output type provided"));
    }

    #[test]
    fn validate_treats_whitespace_as_missing() {
        let settings = Settings {
            auth_type: Some("  ".to_string()),
            auth_role: Some("r1".to_string()),
            output_type: Some("stdout".to_string()),
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert_eq!(err.violations(), ["no vault auth type provided"]);
    }

    #[test]
    fn validate_accepts_complete_config() {
        let settings = Settings {
            auth_type: Some("approle".to_string()),
            auth_role: Some("r1".to_string()),
            output_type: Some("stdout".to_string()),
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn flags_populate_settings() {
        let settings = Settings::try_parse_from([
            "vault-login",
            "--auth-type",
            "approle",
            "--auth-role",
            "r1",
            "--auth-approle-secret-id",
            "abc",
            "--output-type",
            "stdout",
            "--timeout-seconds",
            "3",
        ])
        .unwrap();

        assert_eq!(settings.auth_type.as_deref(), Some("approle"));
        assert_eq!(settings.auth_role.as_deref(), Some("r1"));
        assert_eq!(settings.auth_approle_secret_id.as_deref(), Some("abc"));
        assert_eq!(settings.output_type.as_deref(), Some("stdout"));
        assert_eq!(settings.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn timeout_defaults_to_fifteen_seconds() {
        let settings = Settings::try_parse_from(["vault-login"]).unwrap();
        assert_eq!(settings.timeout(), Duration::from_secs(15));
    }
}
