pub mod constants;
pub mod error;
pub mod message;

pub use constants::*;
pub use error::{NotifyError, Result};
pub use message::MailPush;
