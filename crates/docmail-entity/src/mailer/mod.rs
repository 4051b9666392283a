//! Mailer profile entities.

pub mod model;

pub use model::UserMailer;
