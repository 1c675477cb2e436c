//! Errors

/// Fatal rasterizer failures
///
/// Both variants leave the current path unusable; call `reset` before
/// starting the next one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    #[error("out of memory allocating a cell block")]
    OutOfMemory,

    #[error("cell block limit of {limit} blocks exceeded")]
    CellLimit { limit: usize },
}

/// Diff preconditions that the caller violated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    #[error("buffer sizes differ: {current:?} vs {previous:?}")]
    SizeMismatch {
        current: (usize, usize),
        previous: (usize, usize),
    },

    #[error("buffer of {width}x{height} exceeds 16-bit span coordinates")]
    TooLarge { width: usize, height: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
