use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfSplitterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Only PDF files are allowed: {name}")]
    InvalidFileType { name: String },

    #[error("Please define at least one valid range (Start and End).")]
    NoValidRanges,

    #[error("Range {start}-{end} is invalid. Start page must be less than or equal to end page.")]
    InvalidRangeOrder { start: u64, end: u64 },

    #[error("Invalid page number: '{value}'")]
    InvalidPageNumber { value: String },

    #[error("Page number {value} is too large")]
    PageNumberTooLarge { value: String },

    #[error("An error occurred during processing.")]
    SplitService,

    #[error("A split request is already in progress")]
    SessionBusy,

    #[error("Output directory error: {reason}")]
    OutputDirectory { reason: String },
}

impl PdfSplitterError {
    /// Errors resolved locally before any request leaves the process.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PdfSplitterError::NoValidRanges
                | PdfSplitterError::InvalidRangeOrder { .. }
                | PdfSplitterError::InvalidPageNumber { .. }
                | PdfSplitterError::PageNumberTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PdfSplitterError>;
