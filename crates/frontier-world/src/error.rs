//! Error types for the `frontier-world` crate.

use frontier_types::{ObjectId, Position};

/// Errors that can occur during grid and registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The position lies outside the grid.
    #[error("position out of bounds: {0}")]
    OutOfBounds(Position),

    /// The grid dimensions are zero or too large to address.
    #[error("invalid world dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// No object with this id is registered.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// An object with this id is already registered.
    #[error("duplicate object id: {0}")]
    DuplicateObject(ObjectId),
}
