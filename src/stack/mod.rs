//! Stack model and synchronization
//!
//! - the ordered branch sequence with its derived parent relationship
//! - the sync engine that walks it, applying the configured mode

pub mod stack;
pub mod sync;

pub use stack::Stack;
pub use sync::SyncEngine;
