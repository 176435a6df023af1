//! Domain models for inbound notifications.

mod notification;

pub use notification::{ATTACHMENT_COLOR, DEFAULT_SUBJECT, Notification};
