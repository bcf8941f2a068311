//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `gastwerk_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("gastwerk_core ping={}", gastwerk_core::ping());
    println!("gastwerk_core version={}", gastwerk_core::core_version());
}
