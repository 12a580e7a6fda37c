#![deny(missing_docs)]

//! # cursus-core — Foundational Types for the Cursus Doctoral Stack
//!
//! This crate defines the foundational types that every other crate in the
//! workspace depends on. It has no internal crate dependencies — only `serde`,
//! `thiserror`, `chrono`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass an [`InscriptionId`] where a
//!    [`SoutenanceId`] is expected.
//!
//! 2. **UTC only.** Doctoral campaigns, submission instants, and defense
//!    dates are stored as UTC timestamps; local-time rendering is a
//!    presentation concern. All duration arithmetic flows through
//!    [`elapsed_months`], so the month-boundary rules live in exactly one
//!    place.
//!
//! 3. **Validated construction.** String-based primitives ([`CampaignId`])
//!    check their format at construction time and return a
//!    [`ValidationError`] carrying the rejected input — no silently invalid
//!    records.

pub mod documents;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use documents::{missing_for_defense, DocumentKind, DocumentRef};
pub use error::ValidationError;
pub use identity::{CampaignId, DerogationId, InscriptionId, PersonId, SoutenanceId};
pub use temporal::elapsed_months;
