pub mod catalog;
pub mod enums;
pub mod error;
pub mod mapping;
pub mod session;

pub use catalog::{CanonicalCatalog, CanonicalFieldSpec};
pub use enums::{FileStatus, FileType, JobState, OverallStatus, SemanticType};
pub use error::{ModelError, Result};
pub use mapping::{DetectedField, FieldMapping, UploadedFileRef};
pub use session::{JobStatus, UploadSession};
