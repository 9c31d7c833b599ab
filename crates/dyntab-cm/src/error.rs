use thiserror::Error;

use crate::object_id::CmObjectId;

/// Errors reported by Configuration Manager queries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CmError {
    /// A required object is not present in the platform description.
    #[error("configuration manager object {0} not found")]
    NotFound(CmObjectId),

    /// The object registered under an ID does not carry the record type the
    /// caller asked for. This is the typed counterpart of a short or
    /// malformed buffer from the Configuration Manager.
    #[error("configuration manager object {0} has an unexpected record type")]
    ObjectMismatch(CmObjectId),

    /// The object exists but its record list is empty where at least one
    /// entry is required.
    #[error("configuration manager object {0} is empty")]
    EmptyObject(CmObjectId),
}
