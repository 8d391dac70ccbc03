//! Emergency alert delivery.
//!
//! An [`EmergencyAlert`] is rendered into an [`AlertEmail`] and handed to
//! exactly one [`MailDispatcher`], chosen at startup from the mail
//! settings. Delivery is attempted once; nothing is queued or retried.

pub mod dispatcher;
pub mod error;
pub mod message;
pub mod provider_api;
pub mod smtp;
pub mod types;

pub use dispatcher::{build_dispatcher, MailDispatcher};
pub use error::DispatchError;
pub use message::AlertEmail;
pub use types::{DispatchReceipt, DispatchResult, EmergencyAlert};
