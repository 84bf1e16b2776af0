use tokio::io::AsyncWriteExt;

use crate::error::RelayError;
use crate::settings::Settings;

/// Overwrites a single file with the token.
///
/// The file is created owner read/write, group read, no world access.
/// The write is a plain truncate-and-rewrite, not an atomic rename; a
/// crash mid-write can leave a partial file.
#[derive(Debug)]
pub struct FileWriter {
    file_name: String,
}

impl FileWriter {
    /// Fails before any filesystem access when no file name is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self, RelayError> {
        match settings.output_secret_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(Self {
                file_name: name.to_string(),
            }),
            _ => Err(RelayError::MissingFileName),
        }
    }

    pub async fn write(&self, data: &[u8]) -> Result<(), RelayError> {
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o640);

        let mut file = options
            .open(&self.file_name)
            .await
            .map_err(|e| self.delivery(e))?;
        file.write_all(data).await.map_err(|e| self.delivery(e))?;
        file.flush().await.map_err(|e| self.delivery(e))?;
        Ok(())
    }

    fn delivery(&self, source: std::io::Error) -> RelayError {
        RelayError::DeliveryFailed {
            destination: "file",
            reason: format!("{}: {}", self.file_name, source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_settings(name: &str) -> Settings {
        Settings {
            output_secret_name: Some(name.to_string()),
            ..Settings::default()
        }
    }

    #[test]
    fn missing_file_name_fails_construction() {
        let err = FileWriter::from_settings(&Settings::default()).unwrap_err();
        assert!(matches!(err, RelayError::MissingFileName));

        let err = FileWriter::from_settings(&file_settings("   ")).unwrap_err();
        assert!(matches!(err, RelayError::MissingFileName));
    }

    #[tokio::test]
    async fn write_overwrites_with_restrictive_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let writer = FileWriter::from_settings(&file_settings(path.to_str().unwrap())).unwrap();

        writer.write(b"s.first-token-is-longer").await.unwrap();
        writer.write(b"s.second").await.unwrap();

        let content = std::fs::read(&path).unwrap();
        assert_eq!(content, b"s.second");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o640);
        }
    }

    #[tokio::test]
    async fn write_to_directory_path_is_a_delivery_failure() {
        let dir = tempfile::tempdir().unwrap();
        let writer =
            FileWriter::from_settings(&file_settings(dir.path().to_str().unwrap())).unwrap();

        let err = writer.write(b"s.token").await.unwrap_err();
        assert!(matches!(
            err,
            RelayError::DeliveryFailed {
                destination: "file",
                ..
            }
        ));
    }
}
