//! Domain models for the pharmacy-unit record keeper.

mod batch;
mod dates;
mod medication;
mod patient;
mod reference;

pub use batch::*;
pub use dates::*;
pub use medication::*;
pub use patient::*;
pub use reference::*;

/// Generate a prefixed record id (e.g. `BCH-6f1c...`).
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}
