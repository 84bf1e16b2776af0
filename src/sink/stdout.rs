use tokio::io::AsyncWriteExt;

use crate::error::RelayError;

/// Emits the token bytes on standard output, exactly as received.
///
/// Diagnostics go to stderr, so stdout carries nothing but the token.
#[derive(Default, Debug)]
pub struct StdoutWriter;

impl StdoutWriter {
    pub fn new() -> Self {
        Self
    }

    pub async fn write(&self, data: &[u8]) -> Result<(), RelayError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(data).await.map_err(delivery)?;
        stdout.flush().await.map_err(delivery)?;
        Ok(())
    }
}

fn delivery(source: std::io::Error) -> RelayError {
    RelayError::DeliveryFailed {
        destination: "stdout",
        reason: source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_succeeds_on_open_stream() {
        let writer = StdoutWriter::new();
        assert!(writer.write(b"").await.is_ok());
    }
}
