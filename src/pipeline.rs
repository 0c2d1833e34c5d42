//! Portfolio Pipeline - Single Entry Point
//!
//! CRITICAL: assemble MUST call validate internally. No bypass.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use uuid::Uuid;

use crate::document::{self, DocumentError, DocumentInfo};
use crate::hashing::{compute_profile_hash, sha256_hex};
use crate::layout::LayoutSettings;
use crate::profile::ProfileInput;
use crate::selection::{with_default_extension, PathSelector};
use crate::thumbnail;
use crate::validation::{ValidationFailure, ValidationResult, Validator};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

/// Failures of [`PortfolioBuilder::assemble`]. Image problems are not here:
/// they degrade the document instead of failing it.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("Failed to create PDF: {0}")]
    DocumentWriteFailed(String),
}

/// Everything a submission can end with, short of success.
/// `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("Please select a photo.")]
    NoPhotoSelected,

    #[error("Please choose a location to save the PDF.")]
    NoDestinationSelected,

    #[error("Failed to create PDF: {0}")]
    DocumentWriteFailed(String),
}

impl From<AssembleError> for SubmitError {
    fn from(err: AssembleError) -> Self {
        match err {
            AssembleError::Validation(kind) => SubmitError::Validation(kind),
            AssembleError::DocumentWriteFailed(reason) => SubmitError::DocumentWriteFailed(reason),
        }
    }
}

impl SubmitError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SubmitError::Validation(_))
    }
}

/// What was written, for the caller to show or log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub id: String,
    pub output: PathBuf,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub bytes: u64,
    pub sha256: String,
    pub profile_hash: String,
    pub page_count: usize,
    /// Pixel size of the embedded thumbnail, if one was embedded.
    pub thumbnail: Option<[u32; 2]>,
    /// Set when the photo could not be used and the document has no image.
    pub image_error: Option<String>,
}

impl BuildReport {
    pub fn is_degraded(&self) -> bool {
        self.image_error.is_some()
    }

    /// One coherent outcome message, never a failure and a success at once.
    pub fn user_message(&self) -> String {
        match &self.image_error {
            None => format!(
                "Portfolio created successfully.\nPDF saved as {}",
                self.output.display()
            ),
            Some(reason) => format!(
                "Portfolio created without a photo. Failed to process the image: {}\nPDF saved as {}",
                reason,
                self.output.display()
            ),
        }
    }
}

/// The portfolio pipeline - single entry point for validating and building
pub struct PortfolioBuilder {
    validator: Validator,
    settings: LayoutSettings,
}

impl PortfolioBuilder {
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            validator: Validator::new(),
            settings,
        }
    }

    /// Validate a profile, stopping at the first failure.
    ///
    /// This is the ONLY validation entry point used by assembly.
    pub fn validate(&self, input: &ProfileInput) -> ValidationResult {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.validate(input)
    }

    /// Validate and report every failure at once.
    pub fn validate_all(&self, input: &ProfileInput) -> ValidationResult {
        self.validator.validate_all(input)
    }

    /// One full submission: validate, select photo and destination, assemble.
    pub fn submit(
        &self,
        input: &ProfileInput,
        selector: &mut dyn PathSelector,
    ) -> Result<BuildReport, SubmitError> {
        tracing::debug!("portfolio submission");

        if let Some(kind) = self.validate(input).first_failure() {
            tracing::info!(reason = %kind, "submission rejected");
            return Err(kind.into());
        }

        let photo = selector.choose_photo().ok_or(SubmitError::NoPhotoSelected)?;
        let destination = selector
            .choose_destination()
            .ok_or(SubmitError::NoDestinationSelected)?;
        let destination = with_default_extension(&destination);

        Ok(self.assemble(input, &photo, &destination)?)
    }

    /// Build the document and write it to `destination`.
    ///
    /// CRITICAL: This ALWAYS validates first. An unusable photo yields a
    /// document without the image and a report naming the reason.
    pub fn assemble(
        &self,
        input: &ProfileInput,
        photo: &Path,
        destination: &Path,
    ) -> Result<BuildReport, AssembleError> {
        // MANDATORY: no document from an unvalidated profile
        if let Some(kind) = self.validate(input).first_failure() {
            return Err(kind.into());
        }

        let (thumbnail, image_error) = match thumbnail::prepare(
            photo,
            self.settings.thumbnail_box_px,
            self.settings.jpeg_quality,
        ) {
            Ok(thumb) => {
                tracing::debug!(width = thumb.width, height = thumb.height, "thumbnail ready");
                (Some(thumb), None)
            }
            Err(e) => {
                tracing::warn!(photo = %photo.display(), error = %e, "building without photo");
                (None, Some(e.to_string()))
            }
        };

        let profile_hash = compute_profile_hash(input, ENGINE_VERSION)
            .map_err(|e| AssembleError::DocumentWriteFailed(e.to_string()))?;

        let created_at = Utc::now();
        let info = DocumentInfo {
            author: input.name.clone(),
            producer: format!("portfolio-builder {}", ENGINE_VERSION),
            created_at,
        };
        let rendered = document::render(input, thumbnail.as_ref(), &self.settings, &info)
            .map_err(|e| AssembleError::DocumentWriteFailed(e.to_string()))?;

        write_atomically(destination, &rendered.bytes)
            .map_err(|e| AssembleError::DocumentWriteFailed(e.to_string()))?;

        let report = BuildReport {
            id: Uuid::new_v4().to_string(),
            output: destination.to_path_buf(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at,
            bytes: rendered.bytes.len() as u64,
            sha256: sha256_hex(&rendered.bytes),
            profile_hash,
            page_count: rendered.page_count,
            thumbnail: thumbnail.as_ref().map(|t| t.dimensions()),
            image_error,
        };

        tracing::info!(
            output = %report.output.display(),
            bytes = report.bytes,
            pages = report.page_count,
            "portfolio written"
        );
        Ok(report)
    }
}

impl Default for PortfolioBuilder {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

/// Write to a temporary file next to `destination`, then rename over it.
/// The temporary file is removed on every failure path.
fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<(), DocumentError> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if fs::metadata(destination).map(|m| m.is_dir()).unwrap_or(false) {
        return Err(DocumentError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("{} is a directory", destination.display()),
        )));
    }

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    // The temp file is created owner-only; give the PDF the mode it would
    // have had as an ordinary file, or keep the one it is replacing
    if let Some(permissions) = output_permissions(destination) {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(destination).map_err(|e| DocumentError::Io(e.error))?;
    Ok(())
}

fn output_permissions(destination: &Path) -> Option<fs::Permissions> {
    if let Ok(existing) = fs::metadata(destination) {
        return Some(existing.permissions());
    }
    default_permissions()
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::FixedSelection;

    fn valid_profile() -> ProfileInput {
        ProfileInput::from_form("Ada", "5551234", "ada@example.com", "BSc", "Rust")
    }

    #[test]
    fn test_messages_match_user_facing_text() {
        assert_eq!(SubmitError::NoPhotoSelected.to_string(), "Please select a photo.");
        assert_eq!(
            SubmitError::NoDestinationSelected.to_string(),
            "Please choose a location to save the PDF."
        );
        assert_eq!(
            SubmitError::from(ValidationFailure::MissingField).to_string(),
            "Please fill in all the fields."
        );
        assert_eq!(
            SubmitError::DocumentWriteFailed("disk full".into()).to_string(),
            "Failed to create PDF: disk full"
        );
    }

    #[test]
    fn test_submit_without_photo() {
        let builder = PortfolioBuilder::default();
        let mut sel = FixedSelection { photo: None, destination: Some("x.pdf".into()) };
        let err = builder.submit(&valid_profile(), &mut sel).unwrap_err();
        assert!(matches!(err, SubmitError::NoPhotoSelected));
    }

    #[test]
    fn test_submit_without_destination() {
        let builder = PortfolioBuilder::default();
        let mut sel = FixedSelection { photo: Some("me.png".into()), destination: None };
        let err = builder.submit(&valid_profile(), &mut sel).unwrap_err();
        assert!(matches!(err, SubmitError::NoDestinationSelected));
    }

    #[test]
    fn test_submit_validates_before_selecting() {
        struct Panicking;
        impl PathSelector for Panicking {
            fn choose_photo(&mut self) -> Option<PathBuf> { panic!("must not be asked") }
            fn choose_destination(&mut self) -> Option<PathBuf> { panic!("must not be asked") }
        }

        let builder = PortfolioBuilder::default();
        let input = ProfileInput::from_form("Ada", "abc", "ada@example.com", "BSc", "Rust");
        let err = builder.submit(&input, &mut Panicking).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please enter a valid mobile number (numbers only).");
    }

    #[test]
    fn test_report_messages() {
        let mut report = BuildReport {
            id: "id".into(),
            output: PathBuf::from("out/me.pdf"),
            engine_version: ENGINE_VERSION.into(),
            created_at: Utc::now(),
            bytes: 1,
            sha256: String::new(),
            profile_hash: String::new(),
            page_count: 1,
            thumbnail: Some([200, 100]),
            image_error: None,
        };
        assert_eq!(
            report.user_message(),
            "Portfolio created successfully.\nPDF saved as out/me.pdf"
        );

        report.image_error = Some("cannot decode image".into());
        assert!(report.is_degraded());
        let msg = report.user_message();
        assert!(msg.starts_with("Portfolio created without a photo."));
        assert!(msg.contains("Failed to process the image: cannot decode image"));
        assert!(!msg.contains("successfully"));
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    #[test]
    fn test_profile_values_stay_out_of_logs() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let builder = PortfolioBuilder::default();
        let accepted = ProfileInput::from_form("Grace Hopper", "5551234", "grace@navy.mil", "PhD", "COBOL");
        let rejected = ProfileInput::from_form("Grace Hopper", "555-1234", "grace@navy.mil", "PhD", "COBOL");
        tracing::subscriber::with_default(subscriber, || {
            let mut sel = FixedSelection { photo: None, destination: None };
            let _ = builder.submit(&accepted, &mut sel);
            let _ = builder.submit(&rejected, &mut sel);
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("portfolio submission"));
        assert!(logs.contains("submission rejected"));
        for value in ["Grace Hopper", "grace@navy.mil", "5551234", "COBOL"] {
            assert!(!logs.contains(value), "{value} leaked into logs");
        }
    }

    #[test]
    fn test_write_atomically_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_atomically(dir.path(), b"x").is_err());
    }
}
