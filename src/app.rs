use std::time::Duration;

use tokio::time::{Instant, timeout_at};

use crate::auth::AuthMethod;
use crate::error::RelayError;
use crate::settings::Settings;
use crate::sink::TokenWriter;
use crate::source::VaultTokenSource;

/// One source, one destination, one run.
pub struct App {
    source: VaultTokenSource,
    sink: TokenWriter,
}

impl App {
    /// Build strategy, source and sink. Any failure here aborts the run
    /// before a single network call is made against Vault.
    pub async fn from_settings(settings: &Settings) -> Result<Self, RelayError> {
        let auth = AuthMethod::from_settings(settings)?;
        let source = VaultTokenSource::new(&settings.vault_addr, auth)?;
        let sink = TokenWriter::from_settings(settings).await?;

        Ok(Self { source, sink })
    }

    /// Retrieve-then-deliver under one deadline fixed at entry.
    ///
    /// A login failure is fatal with no compensation: the source holds no
    /// confirmed token in that branch. A delivery failure triggers the
    /// compensation path: revoke the issued token exactly once and report
    /// the delivery error, with any cleanup error alongside it.
    pub async fn run_with_deadline(mut self, timeout: Duration) -> Result<(), RelayError> {
        let deadline = Instant::now() + timeout;

        let token = timeout_at(deadline, self.source.receive())
            .await
            .map_err(|_| RelayError::Timeout {
                stage: "login",
                timeout,
            })??;
        tracing::info!("token received");

        let written = match timeout_at(deadline, self.sink.write(token.as_bytes())).await {
            Ok(result) => result,
            Err(_) => Err(RelayError::Timeout {
                stage: "delivery",
                timeout,
            }),
        };

        match written {
            Ok(()) => {
                tracing::info!(
                    destination = self.sink.destination(),
                    "wrote received token to configured output"
                );
                Ok(())
            }
            Err(delivery) => {
                tracing::warn!(error = %delivery, "could not write token, revoking issued token");
                match timeout_at(deadline, self.source.cleanup()).await {
                    Ok(Ok(())) => Err(delivery),
                    Ok(Err(cleanup)) => Err(RelayError::DeliveryWithFailedCleanup {
                        delivery: Box::new(delivery),
                        cleanup: Box::new(cleanup),
                    }),
                    Err(_) => Err(RelayError::DeliveryWithFailedCleanup {
                        delivery: Box::new(delivery),
                        cleanup: Box::new(RelayError::Timeout {
                            stage: "cleanup",
                            timeout,
                        }),
                    }),
                }
            }
        }
    }
}

/// Validate, build, run. Validation failures abort before anything
/// downstream is constructed.
pub async fn run(settings: Settings) -> Result<(), RelayError> {
    settings.validate()?;

    let timeout = settings.timeout();
    let app = App::from_settings(&settings).await?;
    app.run_with_deadline(timeout).await
}
