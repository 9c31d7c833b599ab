use std::sync::Arc;

use dyntab_cm::ConfigurationManager;

use crate::error::{Result, TableGenError};
use crate::id::GeneratorId;

/// A request to build one ACPI table instance.
///
/// This is the standard-namespace "ACPI table list" record the table
/// manager hands to a generator: which generator to use, the expected
/// signature/revision (validated against the generator descriptor), OEM
/// header fields, and, for the RAW generator, the pre-built blob.
#[derive(Clone, Debug)]
pub struct AcpiTableInfo {
    pub signature: [u8; 4],
    pub revision: u8,
    pub generator_id: GeneratorId,
    pub oem_table_id: u64,
    pub oem_revision: u32,
    /// Pre-built table data for the RAW/DSDT/SSDT generators; `None` for
    /// generators that synthesize their table.
    pub table_data: Option<Arc<[u8]>>,
}

/// A request to build one SMBIOS table instance.
#[derive(Clone, Debug)]
pub struct SmbiosTableInfo {
    pub table_type: u8,
    pub generator_id: GeneratorId,
    pub table_data: Option<Arc<[u8]>>,
}

/// Static identity of a table generator: everything the table manager
/// needs to select it and stamp table headers, short of the build logic.
#[derive(Clone, Debug)]
pub struct GeneratorDescriptor {
    pub id: GeneratorId,
    pub description: &'static str,
    /// ACPI table signature, or `[0; 4]` for generators with no fixed
    /// signature (RAW).
    pub signature: [u8; 4],
    /// ACPI table revision, or 0 where not applicable.
    pub revision: u8,
    pub creator_id: [u8; 4],
    pub creator_revision: u32,
}

enum TableData {
    /// Synthesized by the generator; dropped on free.
    Generated(Vec<u8>),
    /// Supplied by the Configuration Manager (RAW); freeing the table only
    /// releases this reference, the blob stays with its owner.
    Provided(Arc<[u8]>),
}

/// A fully built ACPI table blob.
///
/// Owned by the caller from `build` until it is handed back through
/// `free`; a table cannot be freed twice or leak past its generator.
pub struct BuiltAcpiTable {
    data: TableData,
}

impl BuiltAcpiTable {
    pub fn generated(bytes: Vec<u8>) -> Self {
        Self {
            data: TableData::Generated(bytes),
        }
    }

    pub fn provided(bytes: Arc<[u8]>) -> Self {
        Self {
            data: TableData::Provided(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.data {
            TableData::Generated(v) => v,
            TableData::Provided(a) => a,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// The table signature from the header, if the blob is large enough to
    /// carry one.
    pub fn signature(&self) -> Option<[u8; 4]> {
        self.as_bytes().get(0..4)?.try_into().ok()
    }

    /// The `Length` field from the header, if present.
    pub fn header_length(&self) -> Option<u32> {
        let bytes = self.as_bytes().get(4..8)?;
        Some(u32::from_le_bytes(bytes.try_into().ok()?))
    }
}

impl core::fmt::Debug for BuiltAcpiTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BuiltAcpiTable")
            .field("signature", &self.signature())
            .field("len", &self.len())
            .finish()
    }
}

/// An ACPI table generator: a descriptor plus build/free operations.
///
/// Implementations are registered with the
/// [`TableFactory`](crate::TableFactory) and looked up by
/// [`GeneratorId`] when the table manager constructs tables.
pub trait AcpiTableGenerator: core::fmt::Debug {
    fn descriptor(&self) -> &GeneratorDescriptor;

    /// Build the table described by `table_info`, querying `cm` for the
    /// platform objects the table depends on.
    ///
    /// On failure nothing is returned; a partially assembled buffer can
    /// never escape.
    fn build(
        &self,
        table_info: &AcpiTableInfo,
        cm: &dyn ConfigurationManager,
    ) -> Result<BuiltAcpiTable>;

    /// Release a table previously produced by this generator's `build`.
    ///
    /// Validates the generator/table-info pairing, then consumes the
    /// table. The default covers every generator whose buffer has no
    /// out-of-band owner.
    fn free(&self, table_info: &AcpiTableInfo, table: BuiltAcpiTable) -> Result<()> {
        if table_info.generator_id != self.descriptor().id {
            return Err(TableGenError::InvalidParameter(
                "table info does not match the generator that built the table",
            ));
        }
        drop(table);
        Ok(())
    }
}

/// An SMBIOS table generator.
///
/// The framework reserves this class and the factory can register and
/// dispatch such generators; no standard SMBIOS generators are shipped.
pub trait SmbiosTableGenerator: core::fmt::Debug {
    fn descriptor(&self) -> &GeneratorDescriptor;

    fn build(
        &self,
        table_info: &SmbiosTableInfo,
        cm: &dyn ConfigurationManager,
    ) -> Result<BuiltAcpiTable>;

    fn free(&self, table_info: &SmbiosTableInfo, table: BuiltAcpiTable) -> Result<()> {
        if table_info.generator_id != self.descriptor().id {
            return Err(TableGenError::InvalidParameter(
                "table info does not match the generator that built the table",
            ));
        }
        drop(table);
        Ok(())
    }
}
