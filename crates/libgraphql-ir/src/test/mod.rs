//! Test-only helpers shared across the crate's test modules.
