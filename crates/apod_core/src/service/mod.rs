//! Explorer use-case services.
//!
//! # Responsibility
//! - Orchestrate model, feed and slot persistence into caller-facing APIs.
//! - Stay free of UI concerns; callers render outcomes themselves.

pub mod date_range;
pub mod explorer;
pub mod favorites;
