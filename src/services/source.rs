use crate::error::{PdfSplitterError, Result};
use crate::types::SourceFile;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

impl SourceFile {
    /// Reads a PDF from disk. Only the name is checked; the bytes are opaque.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Self::check_name(&name)?;

        if !path.is_file() {
            return Err(PdfSplitterError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let bytes = fs::read(path).await?;
        info!("Selected '{}' ({} bytes)", name, bytes.len());

        Ok(Self {
            name,
            bytes: Arc::from(bytes),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let name = name.into();
        Self::check_name(&name)?;
        Ok(Self {
            name,
            bytes: bytes.into(),
        })
    }

    fn check_name(name: &str) -> Result<()> {
        if name.to_ascii_lowercase().ends_with(".pdf") {
            Ok(())
        } else {
            Err(PdfSplitterError::InvalidFileType {
                name: name.to_string(),
            })
        }
    }
}
