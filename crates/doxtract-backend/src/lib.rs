//! # doxtract-backend: collaborators and pipeline
//!
//! Implements the external-collaborator side of doxtract: a DOCX
//! reader that enumerates body elements in document order (manual ZIP
//! + XML parsing), the LibreOffice conversion collaborator for
//! enhanced mode, a lopdf-backed page-text source, and the
//! [`DocxProcessor`] pipeline that wires them into `doxtract-core`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doxtract_backend::DocxProcessor;
//! use doxtract_core::ProcessingConfig;
//!
//! # fn main() -> doxtract_core::Result<()> {
//! let config = ProcessingConfig {
//!     extract_page_numbers: true, // degrades gracefully without LibreOffice
//!     ..ProcessingConfig::default()
//! };
//! let processor = DocxProcessor::with_config(config)?;
//! let doc = processor.process("report.docx".as_ref())?;
//!
//! for entry in &doc.toc {
//!     println!("{} {:?}", entry.title, entry.page);
//! }
//! # Ok(())
//! # }
//! ```

pub mod docx;
pub mod output;
pub mod pdf;
pub mod pipeline;
pub mod soffice;
pub mod traits;

pub use docx::DocxReader;
pub use pdf::PdfPageSource;
pub use pipeline::DocxProcessor;
pub use soffice::SofficeConverter;
pub use traits::{DocumentReader, PageSource, RawDocument};
