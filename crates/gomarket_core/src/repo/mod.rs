//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the cart snapshot access contract.
//! - Isolate SQLite and JSON wire details from cart orchestration.
//!
//! # Invariants
//! - Repository writes must validate every product before persistence.
//! - Read paths reject invalid persisted state instead of masking it;
//!   recovery policy belongs to the service layer.

pub mod cart_repo;
