//! Document processing pipeline.
//!
//! [`DocxProcessor`] is the primary entry point: it wires the DOCX
//! reader into the core extraction logic and, when the external
//! conversion collaborator is present, runs the enhanced page-mapping
//! stage on top. Capability detection happens once at construction;
//! the rest of the pipeline only consults the resulting
//! [`CapabilitySet`], so a missing collaborator degrades the page
//! mapper and nothing else.

use crate::docx::DocxReader;
use crate::output;
use crate::pdf::PdfPageSource;
use crate::soffice::SofficeConverter;
use crate::traits::{DocumentReader, PageSource, RawDocument};
use doxtract_core::{
    apply_page_mappings, build_hierarchy, derive_toc, map_sections, CapabilitySet,
    DocumentMetadata, DoxtractError, ProcessedDocument, ProcessingConfig, Result,
};
use image::GenericImageView;
use log::{info, warn};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// One-stop DOCX processor.
///
/// # Examples
///
/// ```rust,no_run
/// use doxtract_backend::DocxProcessor;
///
/// # fn main() -> doxtract_core::Result<()> {
/// let processor = DocxProcessor::new()?;
/// let doc = processor.process("report.docx".as_ref())?;
/// println!("{} sections", doc.tree.section_count());
/// # Ok(())
/// # }
/// ```
pub struct DocxProcessor {
    config: ProcessingConfig,
    reader: DocxReader,
    soffice: Option<SofficeConverter>,
}

impl DocxProcessor {
    /// Processor with the default configuration.
    ///
    /// # Errors
    /// Returns a configuration error when the defaults have been
    /// tampered with via deserialization; never in practice.
    pub fn new() -> Result<Self> {
        Self::with_config(ProcessingConfig::default())
    }

    /// Processor with an explicit configuration.
    ///
    /// Collaborator detection happens here, once; requesting enhanced
    /// features without the collaborator is allowed and degrades at
    /// processing time.
    ///
    /// # Errors
    /// Returns [`DoxtractError::Configuration`] for invalid settings.
    pub fn with_config(config: ProcessingConfig) -> Result<Self> {
        config.validate()?;
        let soffice = SofficeConverter::detect();
        if config.wants_enhanced() && soffice.is_none() {
            info!("page features requested but no office binary found; they will be skipped");
        }
        Ok(Self {
            config,
            reader: DocxReader::new(),
            soffice,
        })
    }

    /// Which optional collaborators this processor detected.
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        let available = self.soffice.is_some();
        CapabilitySet {
            pdf_conversion: available,
            page_rendering: available,
        }
    }

    /// The active configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Process a DOCX file.
    ///
    /// # Errors
    /// Fatal only when the document itself cannot be read; enhanced
    /// failures degrade to warnings on the result.
    pub fn process(&self, path: &Path) -> Result<ProcessedDocument> {
        let start = Instant::now();
        info!("processing {}", path.display());

        let raw = self.reader.read_file(path, &self.config)?;
        let mut doc = self.assemble(raw);

        doc.metadata.file_size_bytes = fs::metadata(path).ok().map(|m| m.len());
        if doc.metadata.title.is_none() {
            doc.metadata.title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(ToString::to_string);
        }

        self.enhance(path, &mut doc);
        doc.metadata.processing_time_seconds = Some(start.elapsed().as_secs_f64());

        if let Some(dir) = &self.config.output_dir {
            output::save_outputs(&doc, dir, &self.config)?;
        }

        let stats = doc.stats();
        info!(
            "processing completed: {} sections, {} tables, {} images",
            stats.total_sections, stats.total_tables, stats.total_images
        );
        Ok(doc)
    }

    /// Process an in-memory DOCX buffer.
    ///
    /// Enhanced features need a file for the external converter, so
    /// when they are requested the buffer is spilled to a temporary
    /// `.docx` first.
    ///
    /// # Errors
    /// Same contract as [`DocxProcessor::process`].
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<ProcessedDocument> {
        let start = Instant::now();
        let raw = self.reader.read_bytes(bytes, &self.config)?;
        let mut doc = self.assemble(raw);
        doc.metadata.file_size_bytes = Some(bytes.len() as u64);

        if self.config.wants_enhanced() {
            let mut tmp = tempfile::Builder::new()
                .suffix(".docx")
                .tempfile()
                .map_err(DoxtractError::Io)?;
            tmp.write_all(bytes).map_err(DoxtractError::Io)?;
            self.enhance(tmp.path(), &mut doc);
        }

        doc.metadata.processing_time_seconds = Some(start.elapsed().as_secs_f64());
        if let Some(dir) = &self.config.output_dir {
            output::save_outputs(&doc, dir, &self.config)?;
        }
        Ok(doc)
    }

    /// Validate that a file looks like a DOCX document.
    #[must_use]
    pub fn validate_file(&self, path: &Path) -> bool {
        let is_docx_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
        is_docx_ext && DocxReader::is_valid_docx(path)
    }

    /// Build the basic result from the raw element stream.
    fn assemble(&self, raw: RawDocument) -> ProcessedDocument {
        let num_elements = raw.elements.len();
        let mut built = build_hierarchy(&raw.elements, &self.config.classifier);

        // Probe image dimensions the way the reader cannot: by decoding.
        for artifact in &mut built.images {
            if let Ok(decoded) = image::load_from_memory(&artifact.data) {
                let (width, height) = decoded.dimensions();
                artifact.width = Some(width);
                artifact.height = Some(height);
            }
        }

        let toc = if self.config.extract_toc {
            derive_toc(&built.tree)
        } else {
            Vec::new()
        };

        let mut warnings = raw.warnings;
        warnings.append(&mut built.warnings);

        ProcessedDocument {
            tree: built.tree,
            toc,
            tables: built.tables,
            images: built.images,
            page_mappings: Vec::new(),
            headers_footers: raw.headers_footers,
            endnotes: raw.endnotes,
            capabilities: self.capabilities(),
            metadata: DocumentMetadata {
                title: raw.title,
                author: raw.author,
                created: raw.created,
                modified: raw.modified,
                num_elements,
                ..DocumentMetadata::default()
            },
            warnings,
        }
    }

    /// Run the enhanced stage when requested. Never fails the
    /// document: collaborator absence and conversion errors both
    /// surface as warnings.
    fn enhance(&self, docx_path: &Path, doc: &mut ProcessedDocument) {
        if !self.config.wants_enhanced() {
            return;
        }
        let Some(soffice) = &self.soffice else {
            doc.warnings.push(
                "page features requested but the office conversion collaborator is unavailable"
                    .to_string(),
            );
            return;
        };

        if let Err(e) = self.run_enhanced(soffice, docx_path, doc) {
            warn!("enhanced processing failed: {e}");
            doc.warnings.push(format!("enhanced processing failed: {e}"));
        }
    }

    fn run_enhanced(
        &self,
        soffice: &SofficeConverter,
        docx_path: &Path,
        doc: &mut ProcessedDocument,
    ) -> Result<()> {
        let scratch = tempfile::tempdir().map_err(DoxtractError::Io)?;

        // A kept PDF goes to the output directory; a throwaway one to
        // scratch space that cleans itself up.
        let pdf_dir = if self.config.convert_to_pdf {
            match &self.config.output_dir {
                Some(dir) => {
                    fs::create_dir_all(dir)?;
                    dir.clone()
                }
                None => scratch.path().to_path_buf(),
            }
        } else {
            scratch.path().to_path_buf()
        };

        let pdf_path = soffice.convert_to_pdf(docx_path, &pdf_dir)?;

        if self.config.extract_page_numbers {
            let source = PdfPageSource::open(&pdf_path)?;
            doc.metadata.total_pages = Some(source.page_count() as u32);
            let pages = source.snapshots(self.config.max_pages)?;
            let mappings = map_sections(&doc.tree, &pages, &self.config.page_map);
            apply_page_mappings(&mut doc.toc, &mappings);
            doc.page_mappings = mappings;
        }

        Ok(())
    }
}
