mod approle;
mod kubernetes;

pub use approle::{AppRoleAuth, SecretIdSource};
pub use kubernetes::KubernetesAuth;

use vaultrs::api::AuthInfo;
use vaultrs::client::VaultClient;

use crate::error::RelayError;
use crate::settings::Settings;

/// Authentication strategies accepted by the relay.
///
/// The set is closed and small, so variants are dispatched with an
/// exhaustive match instead of trait objects.
#[derive(Debug)]
pub enum AuthMethod {
    Kubernetes(KubernetesAuth),
    AppRole(AppRoleAuth),
}

impl AuthMethod {
    /// Build the selected strategy from the parsed settings. Validates the
    /// method-specific parameters; performs no I/O.
    pub fn from_settings(settings: &Settings) -> Result<Self, RelayError> {
        let role = settings
            .auth_role
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let mount = settings
            .auth_mount
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from);

        match settings
            .auth_type
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
        {
            "kubernetes" => {
                let mut auth = KubernetesAuth::new(role, mount);
                if let Ok(path) = std::env::var("K8S_JWT_TOKEN_PATH") {
                    auth = auth.with_jwt_path(path);
                }
                Ok(Self::Kubernetes(auth))
            }
            "approle" => {
                let secret_id = SecretIdSource::from_options(
                    settings.auth_approle_secret_id.as_deref(),
                    settings.auth_approle_secret_id_file.as_deref(),
                )?;
                Ok(Self::AppRole(AppRoleAuth::new(role, secret_id, mount)))
            }
            other => Err(RelayError::UnsupportedAuthType(other.to_string())),
        }
    }

    /// Perform one login exchange with the method-specific credentials.
    pub async fn login(&self, client: &VaultClient) -> Result<AuthInfo, RelayError> {
        match self {
            Self::Kubernetes(auth) => auth.login(client).await,
            Self::AppRole(auth) => auth.login(client).await,
        }
    }
}
