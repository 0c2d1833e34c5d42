//! Portfolio Builder - profile in, one-page PDF out
//!
//! # Guarantees
//! 1. Assembly always validates first
//! 2. Validation reports the first failure: required, phone, email
//! 3. Thumbnails fit 200x200 and are never upscaled
//! 4. The destination is replaced atomically or left untouched
//! 5. An unusable photo degrades the document, it never fails it

pub mod profile;
pub mod validation;
pub mod layout;
pub mod text;
pub mod thumbnail;
pub mod document;
pub mod selection;
pub mod hashing;
pub mod logging;
pub mod pipeline;

pub use profile::{Field, ProfileInput};
pub use validation::{ValidationFailure, ValidationResult, ValidationRule, ValidationViolation, Validator};
pub use layout::{LayoutAuthority, LayoutSettings, PageSize};
pub use thumbnail::{ImageError, Thumbnail};
pub use selection::{FixedSelection, PathSelector, PromptSelection};
pub use hashing::{canonical_json, compute_profile_hash, sha256_hex};
pub use pipeline::{AssembleError, BuildReport, PortfolioBuilder, SubmitError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
