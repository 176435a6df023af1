//! Pure helpers shared by the webhook pipeline.

pub mod markdown;
pub mod secret;

pub use markdown::{normalize_html_entities, replace_embedded_images};
pub use secret::verify_secret;
