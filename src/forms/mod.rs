pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_TIMEOUT, FORMS_URL, FormSender, FormsClient};
pub use error::SubmitError;
pub use types::{Reply, Submission};
