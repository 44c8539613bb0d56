//! Result serialization.
//!
//! Serializers turn a [`crate::ProcessedDocument`] into an export
//! format: nested JSON or YAML for machine consumers, markdown for
//! human-readable output.

pub mod json;
pub mod markdown;
pub mod yaml;

pub use json::{JsonOptions, JsonSerializer};
pub use markdown::{MarkdownOptions, MarkdownSerializer};
pub use yaml::YamlSerializer;
