//! Core business logic - framework-agnostic roster, registration and lineup operations.

/// Audit records describing each mutation
pub mod audit;
/// League and member identifiers
pub mod league;
/// Derived lineup views and the live embed board
pub mod lineup;
/// Per-member locks for mutating commands
pub mod locks;
/// Car-number registrations and claims
pub mod registration;
/// Team/role assignments and capacity enforcement
pub mod roster;

pub use league::{League, MemberId};
