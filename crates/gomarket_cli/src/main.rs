//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `gomarket_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe to validate core crate wiring independently from the
    // Flutter/FFI runtime setup.
    println!("gomarket_core ping={}", gomarket_core::ping());
    println!("gomarket_core version={}", gomarket_core::core_version());
}
