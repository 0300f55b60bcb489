use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or editing world data.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A tile coordinate fell outside the grid.
    #[error("tile ({x}, {y}) is outside a {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// A map row contained a character with no tile meaning.
    #[error("unknown tile glyph '{glyph}' at row {row}, column {column}")]
    UnknownGlyph {
        /// The offending character.
        glyph: char,
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
    },

    /// Map rows had different lengths.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based row.
        row: usize,
        /// Tiles found in that row.
        found: usize,
        /// Tiles in the first row.
        expected: usize,
    },

    /// The requested entity does not exist in the table.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),
}
