//! Background job domain entities.

pub mod model;
pub mod payload;
pub mod status;

pub use model::{JobRecord, QueuedJob};
pub use payload::{MailJobArgs, PayloadError};
pub use status::JobStatus;
