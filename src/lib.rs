pub mod config;
pub mod error;
pub mod kb;
pub mod load;
pub mod report;
pub mod schema;
pub mod validate;
pub mod watch;

pub use config::Config;
pub use error::{KbError, Result};
pub use kb::KnowledgeBase;
pub use schema::{normalize, Dataset};
pub use validate::{validate, Finding, FindingKind, Severity, ValidationResult, Validator};
