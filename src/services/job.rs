use crate::error::{PdfSplitterError, Result};
use crate::types::{PageSpan, SourceFile, SplitJob};
use reqwest::multipart::{Form, Part};

pub const PDF_MIME: &str = "application/pdf";

pub struct JobBuilder;

impl JobBuilder {
    pub fn build(ranges: Vec<PageSpan>, merge: bool, source: &SourceFile) -> SplitJob {
        SplitJob {
            ranges,
            merge,
            source: source.clone(),
        }
    }
}

impl SplitJob {
    /// Comma-separated `start-end` tokens in display order, e.g. `1-3,5-7`.
    pub fn range_spec(&self) -> String {
        self.ranges
            .iter()
            .map(|span| span.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Multipart body for the split service. `merge` is only sent when set.
    pub fn into_form(self) -> Result<Form> {
        let ranges = self.range_spec();
        let file = Part::bytes(self.source.bytes.to_vec())
            .file_name(self.source.name)
            .mime_str(PDF_MIME)
            .map_err(|_| PdfSplitterError::SplitService)?;

        let mut form = Form::new().part("file", file).text("ranges", ranges);
        if self.merge {
            form = form.text("merge", "true");
        }
        Ok(form)
    }
}
