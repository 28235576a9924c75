//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Help, ping and data reset
pub mod general;

/// Live lineup command
pub mod lineup;

/// Car-number registration, claims and profiles
pub mod registration;

/// Sign, move and release
pub mod roster;

// Export commands
pub use general::*;
pub use lineup::*;
pub use registration::*;
pub use roster::*;
