//! Provider identity model.
//!
//! # Responsibility
//! - Define which providers exist and how they are addressed.
//!
//! # Invariants
//! - Every manifest is selected by a `ProviderId`, never by free-form text
//!   past the parsing edge.

pub mod provider;
