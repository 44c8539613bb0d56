//! doxtract CLI - DOCX structure extraction tool
//!
//! Extracts hierarchical content, tables, images and (when LibreOffice
//! is available) page-number mappings from DOCX documents.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use doxtract_backend::{DocxProcessor, SofficeConverter};
use doxtract_core::{
    JsonSerializer, MarkdownSerializer, ProcessedDocument, ProcessingConfig, YamlSerializer,
};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Format bytes as human-readable size (e.g., "1.5 MB")
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

#[derive(Parser)]
#[command(
    name = "doxtract",
    version,
    about = "Advanced DOCX document processing with hierarchical content extraction"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process DOCX files and extract content, images, and tables
    Process {
        /// DOCX files to process
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output root directory (default: alongside each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Serialized document format written to the output directory
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Extract page number mappings (needs LibreOffice)
        #[arg(long)]
        page_numbers: bool,

        /// Keep the converted PDF (needs LibreOffice)
        #[arg(long)]
        pdf: bool,

        /// Skip saving extracted images
        #[arg(long)]
        no_images: bool,

        /// Skip saving extracted tables
        #[arg(long)]
        no_tables: bool,

        /// Maximum pages to consider for page mapping
        #[arg(long)]
        max_pages: Option<u32>,

        /// Parallel jobs when processing several files
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,
    },

    /// Validate DOCX files without processing them
    Validate {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Display available capabilities and collaborator status
    Info,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Yaml,
}

impl OutputFormat {
    const fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Yaml => "yaml",
        };
        write!(f, "{s}")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    match cli.command {
        Commands::Process {
            inputs,
            output,
            format,
            page_numbers,
            pdf,
            no_images,
            no_tables,
            max_pages,
            jobs,
        } => {
            let base_config = ProcessingConfig {
                save_images: !no_images,
                save_tables: !no_tables,
                extract_page_numbers: page_numbers,
                convert_to_pdf: pdf,
                max_pages,
                ..ProcessingConfig::default()
            };
            process_command(&inputs, output.as_deref(), format, &base_config, jobs)
        }
        Commands::Validate { files } => validate_command(&files),
        Commands::Info => info_command(),
    }
}

/// Per-input output directory: `<stem>_output` under the output root
/// (or next to the input when no root is given).
fn output_dir_for(input: &Path, output_root: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let dir_name = format!("{stem}_output");
    match output_root {
        Some(root) => root.join(dir_name),
        None => input.with_file_name(dir_name),
    }
}

fn process_one(
    input: &Path,
    output_root: Option<&Path>,
    format: OutputFormat,
    base_config: &ProcessingConfig,
) -> Result<ProcessedDocument> {
    if !input.exists() {
        bail!("file not found: {}", input.display());
    }

    let out_dir = output_dir_for(input, output_root);
    let config = ProcessingConfig {
        output_dir: Some(out_dir.clone()),
        ..base_config.clone()
    };

    let processor = DocxProcessor::with_config(config)?;
    let doc = processor
        .process(input)
        .with_context(|| format!("failed to process {}", input.display()))?;

    let rendered = match format {
        OutputFormat::Markdown => MarkdownSerializer::new().serialize(&doc),
        OutputFormat::Json => JsonSerializer::new().serialize(&doc)?,
        OutputFormat::Yaml => YamlSerializer::new().serialize(&doc)?,
    };
    let doc_path = out_dir.join(format!("document.{}", format.extension()));
    std::fs::write(&doc_path, rendered)
        .with_context(|| format!("failed to write {}", doc_path.display()))?;

    Ok(doc)
}

fn process_command(
    inputs: &[PathBuf],
    output_root: Option<&Path>,
    format: OutputFormat,
    base_config: &ProcessingConfig,
    jobs: usize,
) -> Result<()> {
    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let run = |input: &PathBuf| {
        progress.set_message(input.display().to_string());
        let result = process_one(input, output_root, format, base_config);
        progress.inc(1);
        (input.clone(), result)
    };

    let results: Vec<(PathBuf, Result<ProcessedDocument>)> = if jobs > 1 && inputs.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build thread pool")?;
        pool.install(|| inputs.par_iter().map(run).collect())
    } else {
        inputs.iter().map(run).collect()
    };
    progress.finish_and_clear();

    let mut failures = 0usize;
    for (input, result) in &results {
        match result {
            Ok(doc) => {
                let stats = doc.stats();
                println!(
                    "{} {}",
                    "✓".green().bold(),
                    input.display().to_string().bold()
                );
                println!("    sections: {}", stats.total_sections);
                println!("    tables:   {}", stats.total_tables);
                println!("    images:   {}", stats.total_images);
                if let Some(pages) = stats.total_pages {
                    println!("    pages:    {pages}");
                }
                if let Some(size) = doc.metadata.file_size_bytes {
                    println!("    size:     {}", format_bytes(size));
                }
                if let Some(elapsed) = doc.metadata.processing_time_seconds {
                    println!("    time:     {elapsed:.2}s");
                }
                for warning in &doc.warnings {
                    println!("    {} {warning}", "warning:".yellow());
                }
                println!(
                    "    output:   {}",
                    output_dir_for(input, output_root).display()
                );
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {e:#}", "✗".red().bold(), input.display());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} files failed", results.len());
    }
    println!("\n{}", "Processing completed successfully!".green());
    Ok(())
}

fn validate_command(files: &[PathBuf]) -> Result<()> {
    let processor = DocxProcessor::new()?;

    let mut valid = 0usize;
    for file in files {
        if !file.exists() {
            println!("{} {} (not found)", "✗".red(), file.display());
            continue;
        }
        let size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);
        if processor.validate_file(file) {
            valid += 1;
            println!(
                "{} {} ({})",
                "✓".green(),
                file.display(),
                format_bytes(size)
            );
        } else {
            println!(
                "{} {} ({})",
                "✗".red(),
                file.display(),
                format_bytes(size)
            );
        }
    }

    println!(
        "\n{valid}/{total} files are valid DOCX documents",
        total = files.len()
    );
    Ok(())
}

fn info_command() -> Result<()> {
    println!("{}", "doxtract - capability status".blue().bold());
    println!();
    println!("Basic extraction (sections, TOC, tables, images): always available");

    match SofficeConverter::detect() {
        Some(converter) => {
            println!(
                "PDF conversion / page numbers: {} ({})",
                "available".green(),
                converter.binary().display()
            );
        }
        None => {
            println!(
                "PDF conversion / page numbers: {} (install LibreOffice, or set {})",
                "unavailable".yellow(),
                doxtract_backend::soffice::SOFFICE_ENV
            );
        }
    }

    let capabilities = DocxProcessor::new()?.capabilities();
    println!();
    println!("pdf_conversion:  {}", capabilities.pdf_conversion);
    println!("page_rendering:  {}", capabilities.page_rendering);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_output_dir_for() {
        let dir = output_dir_for(Path::new("/data/report.docx"), None);
        assert_eq!(dir, Path::new("/data/report_output"));

        let dir = output_dir_for(Path::new("report.docx"), Some(Path::new("/out")));
        assert_eq!(dir, Path::new("/out/report_output"));
    }

    #[test]
    fn test_output_format_extensions() {
        assert_eq!(OutputFormat::Markdown.extension(), "md");
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(OutputFormat::Yaml.extension(), "yaml");
    }
}
