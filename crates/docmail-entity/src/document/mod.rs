//! Document, document file and document version entities.

pub mod model;
pub mod target;

pub use model::{Document, DocumentFile, DocumentVersion};
pub use target::TargetEntity;
