//! Unified error type for pub-button.
//!
//! Most fallible-looking paths are deliberately total: transport writes
//! retry until accepted and bad store contents load as an empty script.
//! What remains is the one condition the caller must handle.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The action list is full; the action was not recorded.
    CapacityExceeded,
}
