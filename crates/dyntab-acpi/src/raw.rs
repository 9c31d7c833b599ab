//! RAW generator: installs a pre-built table blob verbatim.
//!
//! DSDT and SSDT tables come through here too, since their AML is built
//! ahead of time and only needs to be handed on unchanged. The blob stays
//! owned by the Configuration Manager; building takes a reference and
//! freeing releases it.

use dyntab_cm::ConfigurationManager;
use dyntab_core::{
    make_revision, AcpiTableGenerator, AcpiTableInfo, BuiltAcpiTable, GeneratorDescriptor,
    GeneratorId, Result, StdAcpiTableId, TableGenError,
};
use log::{debug, error};

use crate::sdt::validate_table_info;

#[derive(Debug)]
pub struct RawGenerator {
    descriptor: GeneratorDescriptor,
}

impl RawGenerator {
    pub fn new() -> Self {
        Self {
            descriptor: GeneratorDescriptor {
                id: GeneratorId::std_acpi(StdAcpiTableId::Raw),
                description: "ACPI.STD.RAW.GENERATOR",
                // No fixed signature or revision; the blob carries its own.
                signature: [0; 4],
                revision: 0,
                creator_id: *b"ARMH",
                creator_revision: make_revision(1, 0),
            },
        }
    }
}

impl Default for RawGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AcpiTableGenerator for RawGenerator {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &self.descriptor
    }

    fn build(
        &self,
        table_info: &AcpiTableInfo,
        _cm: &dyn ConfigurationManager,
    ) -> Result<BuiltAcpiTable> {
        validate_table_info(&self.descriptor, table_info)?;

        let Some(data) = &table_info.table_data else {
            error!("RAW: table list entry carries no table data");
            return Err(TableGenError::InvalidParameter(
                "the RAW generator requires pre-built table data",
            ));
        };
        let table = BuiltAcpiTable::provided(data.clone());
        debug!(
            "RAW: installing pre-built table {:?} ({} bytes)",
            table.signature().map(|s| s.map(char::from)),
            table.len()
        );
        Ok(table)
    }
}
