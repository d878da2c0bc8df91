//! Write a message to a named pipe once a reader shows up.
//!
//! The target is opened write-only and non-blocking. As long as it doesn't
//! exist yet, or exists without a reader attached, the open is retried at a
//! fixed interval. Once open, the whole message is written in a single call.

use utils::moduse;

pub mod hook;
pub mod open;
moduse!(error);
moduse!(request);
moduse!(retry);
moduse!(writer);
