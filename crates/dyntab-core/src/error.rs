use thiserror::Error;

use dyntab_cm::CmError;

use crate::id::GeneratorId;

pub type Result<T> = std::result::Result<T, TableGenError>;

/// Unified error type for table generation and generator registration.
///
/// The variants map onto the error categories of the firmware status
/// convention: invalid-parameter, not-found, bad-buffer-size (carried by
/// [`TableGenError::Cm`]), out-of-resources, and unsupported.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableGenError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("generator {0} is not registered")]
    GeneratorNotFound(GeneratorId),

    #[error("generator {0} is already registered")]
    AlreadyRegistered(GeneratorId),

    #[error("no free slot to register generator {0}")]
    OutOfResources(GeneratorId),

    #[error("unsupported {what}: {value}")]
    Unsupported { what: &'static str, value: u64 },

    #[error("table info signature {requested:?} does not match generator signature {expected:?}")]
    SignatureMismatch {
        expected: [u8; 4],
        requested: [u8; 4],
    },

    #[error("table info revision {requested} does not match generator revision {expected}")]
    RevisionMismatch { expected: u8, requested: u8 },

    #[error(transparent)]
    Cm(#[from] CmError),
}
