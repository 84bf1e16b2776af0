mod file;
mod kubernetes;
mod stdout;

pub use file::FileWriter;
pub use kubernetes::KubernetesSecretWriter;
pub use stdout::StdoutWriter;

use crate::error::RelayError;
use crate::settings::Settings;

/// Destinations a received token can be handed to.
///
/// Like the auth methods, the destination set is closed, so a sum type
/// with exhaustive dispatch replaces a writer trait object.
#[derive(Debug)]
pub enum TokenWriter {
    Stdout(StdoutWriter),
    File(FileWriter),
    KubernetesSecret(KubernetesSecretWriter),
}

impl TokenWriter {
    /// Select and construct the configured destination. Construction
    /// validates addressing but performs no write.
    pub async fn from_settings(settings: &Settings) -> Result<Self, RelayError> {
        match settings
            .output_type
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
        {
            "stdout" => Ok(Self::Stdout(StdoutWriter::new())),
            "file" => Ok(Self::File(FileWriter::from_settings(settings)?)),
            "kubernetes-secret" => Ok(Self::KubernetesSecret(
                KubernetesSecretWriter::from_settings(settings).await?,
            )),
            other => Err(RelayError::UnsupportedOutputType(other.to_string())),
        }
    }

    /// Single attempt at durably storing the raw token bytes.
    pub async fn write(&self, data: &[u8]) -> Result<(), RelayError> {
        match self {
            Self::Stdout(writer) => writer.write(data).await,
            Self::File(writer) => writer.write(data).await,
            Self::KubernetesSecret(writer) => writer.write(data).await,
        }
    }

    pub fn destination(&self) -> &'static str {
        match self {
            Self::Stdout(_) => "stdout",
            Self::File(_) => "file",
            Self::KubernetesSecret(_) => "kubernetes-secret",
        }
    }
}
