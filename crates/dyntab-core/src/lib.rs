//! Core table generator model for the dynamic table framework.
//!
//! A table generator turns Configuration Manager objects into one firmware
//! table blob. This crate defines the pieces shared by every generator:
//!
//! - [`GeneratorId`]: composite identifiers addressing generators by
//!   namespace, table type, and table ID
//! - [`AcpiTableGenerator`] / [`SmbiosTableGenerator`]: the build/free
//!   interface generators implement
//! - [`BuiltAcpiTable`]: an owned table blob, alive from build to free
//! - [`TableFactory`]: the registry the table manager resolves generators
//!   through
//!
//! Standard ACPI generators live in the `dyntab-acpi` crate; OEM
//! generators implement the traits here and register alongside them.

mod error;
mod factory;
mod generator;
mod id;

pub use error::{Result, TableGenError};
pub use factory::{TableFactory, MAX_OEM_ACPI_GENERATORS, MAX_OEM_SMBIOS_GENERATORS};
pub use generator::{
    AcpiTableGenerator, AcpiTableInfo, BuiltAcpiTable, GeneratorDescriptor, SmbiosTableGenerator,
    SmbiosTableInfo,
};
pub use id::{
    make_revision, GeneratorId, GeneratorNamespace, StdAcpiTableId, StdSmbiosTableId, TableType,
};
