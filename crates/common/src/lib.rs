//! Shared types for the storefront workspace.
//!
//! Everything here is used by more than one crate: aggregate identifiers,
//! the storefront [`Language`], and [`Localized`] English/Hindi text pairs.

mod id;
mod language;

pub use id::AggregateId;
pub use language::{Language, Localized};
