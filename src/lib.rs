//! # PDF Range Splitter
//!
//! Client-side core for splitting a PDF through a remote split service.
//! Page ranges are edited as raw digit strings, validated and normalized at
//! submission, serialized into a multipart request, and the returned archive
//! (or merged PDF) is saved locally.
//!
//! ## Example Usage
//!
//! ```no_run
//! use pdf_range_splitter::{
//!     HttpSplitService, RangeField, ResultDelivery, ServiceConfig, SourceFile, SplitSession,
//! };
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::new("http://localhost:8000")?;
//!     let source = SourceFile::open("document.pdf").await?;
//!     let mut session = SplitSession::new(source, config.reset_delay);
//!
//!     // first range starts at page 1
//!     let first = session.ranges()[0].id;
//!     session.update_range_field(first, RangeField::End, "3")?;
//!
//!     // second range auto-chains to start at page 4
//!     let second = session.create_range()?;
//!     session.update_range_field(second, RangeField::End, "7")?;
//!
//!     let service = HttpSplitService::new(&config)?;
//!     session.submit(&service).await?;
//!
//!     if let Some(artifact) = session.take_artifact() {
//!         let name = session.source().name.clone();
//!         let saved = ResultDelivery::deliver(artifact, &name, Path::new("./output")).await?;
//!         println!("Saved {}", saved.display());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use error::{PdfSplitterError, Result};
pub use services::{
    parse_page_number, HttpSplitService, JobBuilder, RangeList, RangeValidator, ResultDelivery,
    SplitService, SplitSession,
};
pub use types::{
    PageSpan, Range, RangeField, RangeId, RequestTicket, ServiceConfig, SessionStatus,
    SourceFile, SplitArtifact, SplitJob, SplitOutcome, SplitReport,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
