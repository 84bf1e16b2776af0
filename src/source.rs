use vaultrs::client::{Client, VaultClient, VaultClientSettingsBuilder};

use crate::auth::AuthMethod;
use crate::error::RelayError;
use crate::token::Token;

/// Retrieves one client token from Vault and can revoke it again.
///
/// Holds at most one live token per process run: `receive` binds the
/// issued token to the client session, `cleanup` revokes whatever the
/// session holds.
pub struct VaultTokenSource {
    client: VaultClient,
    auth: AuthMethod,
    issued: bool,
}

impl VaultTokenSource {
    /// Bind a strategy to a fresh client. No network I/O happens here.
    pub fn new(addr: &str, auth: AuthMethod) -> Result<Self, RelayError> {
        let settings = VaultClientSettingsBuilder::default()
            .address(addr)
            .build()
            .map_err(|e| RelayError::VaultClient(e.to_string()))?;
        let client =
            VaultClient::new(settings).map_err(|e| RelayError::VaultClient(e.to_string()))?;

        Ok(Self {
            client,
            auth,
            issued: false,
        })
    }

    /// Perform exactly one login exchange and return the issued token.
    /// No internal retries; a failure here leaves nothing to revoke.
    pub async fn receive(&mut self) -> Result<Token, RelayError> {
        let auth_info = self.auth.login(&self.client).await?;
        self.client.set_token(&auth_info.client_token);
        self.issued = true;

        tracing::debug!(
            lease_duration = auth_info.lease_duration,
            renewable = auth_info.renewable,
            "vault login succeeded"
        );

        Ok(Token::new(auth_info.client_token))
    }

    /// Best-effort revocation of the token issued by `receive`.
    ///
    /// Revoke-self acts on the session's own token, so no token id is
    /// passed around. Calling this before a token was issued is a no-op.
    pub async fn cleanup(&mut self) -> Result<(), RelayError> {
        if !self.issued {
            tracing::debug!("no token issued, nothing to revoke");
            return Ok(());
        }

        vaultrs::token::revoke_self(&self.client)
            .await
            .map_err(|e| RelayError::CleanupFailed(e.to_string()))?;
        self.issued = false;

        tracing::info!("issued token revoked");
        Ok(())
    }
}
