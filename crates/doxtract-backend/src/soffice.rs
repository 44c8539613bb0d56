//! LibreOffice conversion collaborator.
//!
//! Enhanced-mode features need the document rendered to PDF. That work
//! is owned by an external office-suite binary (`soffice`); this module
//! only detects it and drives one blocking headless conversion per
//! document. Absence of the binary is a capability gap, not an error:
//! [`SofficeConverter::detect`] returns `None` and the pipeline
//! degrades gracefully.

use doxtract_core::{DoxtractError, Result};
use log::{debug, info};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Candidate binary names probed on `PATH`.
const CANDIDATE_BINARIES: &[&str] = &["soffice", "libreoffice"];

/// Environment variable overriding binary discovery.
pub const SOFFICE_ENV: &str = "DOXTRACT_SOFFICE";

/// Handle to a detected LibreOffice installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SofficeConverter {
    binary: PathBuf,
}

impl SofficeConverter {
    /// Locate LibreOffice.
    ///
    /// The `DOXTRACT_SOFFICE` environment variable wins when set;
    /// otherwise every `PATH` entry is probed for the usual binary
    /// names. Returns `None` when nothing is found.
    #[must_use]
    pub fn detect() -> Option<Self> {
        if let Ok(explicit) = env::var(SOFFICE_ENV) {
            let path = PathBuf::from(explicit);
            if path.is_file() {
                return Some(Self { binary: path });
            }
            return None;
        }

        let path_var = env::var_os("PATH")?;
        for dir in env::split_paths(&path_var) {
            for name in CANDIDATE_BINARIES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    debug!("found office binary at {}", candidate.display());
                    return Some(Self { binary: candidate });
                }
            }
        }
        None
    }

    /// Wrap an explicit binary path (used by tests).
    #[must_use]
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Path of the detected binary.
    #[inline]
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Convert a DOCX to PDF in `out_dir`, returning the PDF path.
    ///
    /// Blocking call-and-wait; the converter does not manage the
    /// process beyond spawn, wait, and exit-status check.
    ///
    /// # Errors
    /// Returns [`DoxtractError::Backend`] when the process fails or the
    /// expected output file does not appear.
    pub fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<PathBuf> {
        info!("converting {} to PDF", input.display());

        let output = Command::new(&self.binary)
            .arg("--headless")
            .arg("--norestore")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(input)
            .output()
            .map_err(|e| DoxtractError::Backend(format!("failed to run office binary: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DoxtractError::Backend(format!(
                "PDF conversion failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let stem = input
            .file_stem()
            .ok_or_else(|| DoxtractError::Backend("input file has no stem".to_string()))?;
        let pdf_path = out_dir.join(stem).with_extension("pdf");
        if !pdf_path.is_file() {
            return Err(DoxtractError::Backend(format!(
                "conversion reported success but {} is missing",
                pdf_path.display()
            )));
        }
        Ok(pdf_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_binary_keeps_path() {
        let converter = SofficeConverter::with_binary(PathBuf::from("/opt/soffice"));
        assert_eq!(converter.binary(), Path::new("/opt/soffice"));
    }

    #[test]
    fn test_convert_with_bogus_binary_fails() {
        let converter =
            SofficeConverter::with_binary(PathBuf::from("/nonexistent/soffice-binary"));
        let err = converter
            .convert_to_pdf(Path::new("in.docx"), Path::new("/tmp"))
            .unwrap_err();
        assert!(matches!(err, DoxtractError::Backend(_)));
    }
}
