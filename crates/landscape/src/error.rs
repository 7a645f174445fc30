// ---------------------------------------------------------------------------
// LandscapeError: error types for terrain edits and world setup
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors returned by grid and terrain editing operations.
///
/// Plain boundary lookups never produce an error (they return `None`); these
/// variants cover requests the caller can act on.
#[derive(Debug)]
pub enum LandscapeError {
    /// An edit was requested with no tiles; nothing was changed.
    EmptySelection,
    /// A coordinate passed to an edit lies outside the grid.
    OutOfBounds { x: u32, z: u32, size: u32 },
    /// World size outside the supported range.
    InvalidWorldSize(u32),
    /// Chunk size of zero.
    InvalidChunkSize(u32),
    /// Terrain modification is switched off in the landscaping tools.
    ModificationDisabled,
    /// A height or step that is NaN or infinite.
    NonFiniteHeight(f32),
    /// Config file could not be read.
    Io(std::io::Error),
    /// Config or command JSON could not be parsed.
    Config(String),
}

impl fmt::Display for LandscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandscapeError::EmptySelection => write!(f, "No tiles selected"),
            LandscapeError::OutOfBounds { x, z, size } => {
                write!(f, "Tile ({x}, {z}) is outside the {size}x{size} grid")
            }
            LandscapeError::InvalidWorldSize(size) => write!(
                f,
                "World size {size} is outside the supported range {}..={}",
                crate::config::MIN_WORLD_SIZE,
                crate::config::MAX_WORLD_SIZE
            ),
            LandscapeError::InvalidChunkSize(size) => write!(f, "Invalid chunk size: {size}"),
            LandscapeError::ModificationDisabled => {
                write!(f, "Terrain modification is disabled")
            }
            LandscapeError::NonFiniteHeight(value) => {
                write!(f, "Height {value} is not a finite number")
            }
            LandscapeError::Io(e) => write!(f, "I/O error: {e}"),
            LandscapeError::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for LandscapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LandscapeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LandscapeError {
    fn from(e: std::io::Error) -> Self {
        LandscapeError::Io(e)
    }
}

impl From<serde_json::Error> for LandscapeError {
    fn from(e: serde_json::Error) -> Self {
        LandscapeError::Config(e.to_string())
    }
}
