//! Domain model for cart contents.
//!
//! # Responsibility
//! - Define the canonical cart line item shared by core logic and FFI.
//! - Keep the persisted wire shape stable across app releases.
//!
//! # Invariants
//! - Every cart line is identified by a stable catalog `id`.
//! - Quantity is a positive integer after any model-level construction.

pub mod product;
