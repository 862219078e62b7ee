//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `habitflow_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("habitflow_core ping={}", habitflow_core::ping());
    println!("habitflow_core version={}", habitflow_core::core_version());
}
