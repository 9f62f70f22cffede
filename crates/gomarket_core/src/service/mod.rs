//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into cart-level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod cart_service;
