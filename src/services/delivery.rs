use crate::error::{PdfSplitterError, Result};
use crate::types::{SplitArtifact, SplitJob, SplitReport};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

const SPLIT_SUFFIX: &str = "_split";

pub struct ResultDelivery;

impl ResultDelivery {
    /// `book.pdf` becomes `book_split.zip`, or `book_split.pdf` for a merged
    /// single-PDF reply.
    pub fn output_filename(source_name: &str, artifact: &SplitArtifact) -> String {
        let stem = strip_pdf_suffix(source_name);
        let extension = if artifact.is_pdf() { "pdf" } else { "zip" };
        format!("{}{}.{}", stem, SPLIT_SUFFIX, extension)
    }

    /// Saves the artifact under its derived name in `output_dir`. The
    /// artifact is consumed and its buffer freed once written.
    pub async fn deliver(
        artifact: SplitArtifact,
        source_name: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        Self::ensure_output_directory(output_dir).await?;

        let output_path = output_dir.join(Self::output_filename(source_name, &artifact));
        fs::write(&output_path, &artifact.bytes).await.map_err(|e| {
            PdfSplitterError::OutputDirectory {
                reason: format!("Failed to write {}: {}", output_path.display(), e),
            }
        })?;
        drop(artifact);

        info!("Saved {}", output_path.display());
        Ok(output_path)
    }

    /// Writes a JSON summary next to a delivered file.
    pub async fn write_report(
        job: &SplitJob,
        output_file: &Path,
        bytes: usize,
    ) -> Result<PathBuf> {
        let report = SplitReport {
            source: job.source.name.clone(),
            ranges: job.range_spec(),
            merge: job.merge,
            output_file: output_file.to_path_buf(),
            bytes,
            completed_at: chrono::Utc::now().to_rfc3339(),
        };

        let report_path = output_file.with_extension("json");
        let json_content = serde_json::to_string_pretty(&report)?;
        fs::write(&report_path, json_content).await.map_err(|e| {
            PdfSplitterError::OutputDirectory {
                reason: format!("Failed to write report file: {}", e),
            }
        })?;

        info!("Generated report file: {}", report_path.display());
        Ok(report_path)
    }

    async fn ensure_output_directory(output_dir: &Path) -> Result<()> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir).await.map_err(|e| {
                PdfSplitterError::OutputDirectory {
                    reason: format!("Failed to create output directory: {}", e),
                }
            })?;
            info!("Created output directory: {}", output_dir.display());
        }
        Ok(())
    }
}

fn strip_pdf_suffix(name: &str) -> &str {
    let cut = name.len().saturating_sub(4);
    match name.get(cut..) {
        Some(tail) if tail.eq_ignore_ascii_case(".pdf") => &name[..cut],
        _ => name,
    }
}
