//! Configuration Manager object model for the dynamic table framework.
//!
//! The Configuration Manager is the platform-specific component that knows
//! what hardware exists: GIC topology, generic timers, serial ports, PCI
//! config space segments. This crate defines:
//!
//! - [`CmObjectId`]: namespace-qualified object identifiers
//! - the ARM namespace records ([`arm`]) that describe one piece of
//!   platform hardware each
//! - [`ConfigurationManager`]: the query interface table generators consume
//! - [`PlatformDescription`]: a ready-made map-backed implementation
//!
//! Objects returned by a Configuration Manager are immutable; generators
//! borrow them for the duration of a single table build.

mod error;
mod manager;
mod object_id;

pub mod arm;

pub use error::CmError;
pub use manager::{
    optional_list, required_list, required_one, CmObject, CmRecord, ConfigurationManager,
    ConfigurationManagerInfo, PlatformDescription,
};
pub use object_id::{ArmObjectId, CmNamespace, CmObjectId, StdObjectId};

/// Convenience alias for fallible Configuration Manager queries.
pub type Result<T> = std::result::Result<T, CmError>;
