#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # imap-entities
//!
//! Reusable, agnostic domain entities for Incident Map.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod comment;
pub mod geo;
pub mod id;
pub mod report;
pub mod time;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
