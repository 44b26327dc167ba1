//! Secret lifecycle: envelope codec, store semantics, authorization gate,
//! and the expiry sweeper.

pub mod codec;
pub mod service;
pub mod store;
pub mod sweeper;

pub use codec::{Envelope, REDACTED};
pub use service::SecretService;
pub use store::{Secret, SecretStore, EXPIRED_MESSAGE, NOT_FOUND_MESSAGE};
pub use sweeper::ExpirySweeper;
