use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "Inconsistent layout at {offset:#x}: inter-block padding {found} does not match established {expected}"
    )]
    InconsistentLayout {
        offset: usize,
        expected: usize,
        found: usize,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Seed {index} out of range: {value} exceeds {max}")]
    SeedOutOfRange { index: usize, value: u32, max: u32 },

    #[error("Write of {len} bytes at {offset:#x} exceeds file length {file_len}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        file_len: u64,
    },

    #[error("Offset {offset:#x} + {delta} overflows the address space")]
    OffsetOverflow { offset: usize, delta: usize },

    #[error("Invalid field at {offset:#x}: {message}")]
    InvalidField { offset: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Errors raised before any byte was written to the target file
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::SeedOutOfRange { .. }
                | Error::OutOfBounds { .. }
                | Error::OffsetOverflow { .. }
        )
    }

    /// Fingerprints matched but their spacing changed part way through
    pub fn is_layout_drift(&self) -> bool {
        matches!(self, Error::InconsistentLayout { .. })
    }
}
