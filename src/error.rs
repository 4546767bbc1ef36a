//! Error types for map generation and its tooling.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The requested world is smaller than one tile in some dimension.
    #[error("map of {width}x{height}px with {tile_size}px tiles has no tiles")]
    EmptyGrid {
        width: u32,
        height: u32,
        tile_size: u32,
    },

    /// The drawing adapter has no surface to draw into.
    #[error("no drawing surface available")]
    NoSurface,

    #[error("tile size must be at least one pixel")]
    InvalidTileSize,

    #[error("invalid map configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    /// True for failures caused by the inputs rather than the environment.
    /// These abort the level start; retrying with the same inputs cannot help.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GenerationError::EmptyGrid { .. }
                | GenerationError::NoSurface
                | GenerationError::InvalidTileSize
                | GenerationError::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_family() {
        assert!(GenerationError::NoSurface.is_configuration());
        assert!(GenerationError::EmptyGrid { width: 0, height: 16, tile_size: 16 }.is_configuration());
        assert!(GenerationError::InvalidConfig("x".into()).is_configuration());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!GenerationError::from(io).is_configuration());
    }

    #[test]
    fn test_empty_grid_message() {
        let err = GenerationError::EmptyGrid { width: 8, height: 640, tile_size: 16 };
        assert_eq!(err.to_string(), "map of 8x640px with 16px tiles has no tiles");
    }
}
