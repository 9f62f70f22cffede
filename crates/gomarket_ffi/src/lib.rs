//! Flutter-facing FFI crate for the GoMarket cart core.

pub mod api;
