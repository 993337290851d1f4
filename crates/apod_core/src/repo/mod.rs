//! Persistence contracts for string-valued slots.
//!
//! # Responsibility
//! - Define the generic get/set string store the services persist through.
//! - Keep SQL details out of the favorites and explorer services.
//!
//! # Invariants
//! - A slot write replaces the whole value; there are no partial updates.
//! - Reading a slot that was never written returns `None`, not an error.

pub mod slot_repo;
