//! Storage adapters implementing the repository ports.

pub mod memory;
pub mod postgres;

/// Converts a backend row count to the port-level `u64` representation.
pub(crate) fn row_count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
