//! MCFG (PCI Express memory-mapped configuration space) generator.

use dyntab_cm::arm::PciConfigSpaceInfo;
use dyntab_cm::{required_list, ArmObjectId, CmObjectId, ConfigurationManager};
use dyntab_core::{
    make_revision, AcpiTableGenerator, AcpiTableInfo, BuiltAcpiTable, GeneratorDescriptor,
    GeneratorId, Result, StdAcpiTableId, TableGenError,
};
use log::{debug, error};

use crate::sdt::{build_sdt_header, finalize_sdt, validate_table_info};

const MCFG_FIXED_LEN: usize = 44;
const MCFG_ALLOCATION_LEN: usize = 16;

#[derive(Debug)]
pub struct McfgGenerator {
    descriptor: GeneratorDescriptor,
}

impl McfgGenerator {
    pub fn new() -> Self {
        Self {
            descriptor: GeneratorDescriptor {
                id: GeneratorId::std_acpi(StdAcpiTableId::Mcfg),
                description: "ACPI.STD.MCFG.GENERATOR",
                signature: *b"MCFG",
                revision: 1,
                creator_id: *b"ARMH",
                creator_revision: make_revision(1, 0),
            },
        }
    }
}

impl Default for McfgGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AcpiTableGenerator for McfgGenerator {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &self.descriptor
    }

    fn build(
        &self,
        table_info: &AcpiTableInfo,
        cm: &dyn ConfigurationManager,
    ) -> Result<BuiltAcpiTable> {
        validate_table_info(&self.descriptor, table_info)?;

        let segments: &[PciConfigSpaceInfo] =
            required_list(cm, CmObjectId::arm(ArmObjectId::PciConfigSpaceInfo))?;
        if segments.is_empty() {
            error!("MCFG: platform describes no PCI configuration spaces");
            return Err(TableGenError::InvalidParameter(
                "at least one PCI configuration space is required",
            ));
        }
        for segment in segments {
            if segment.start_bus_number > segment.end_bus_number {
                error!(
                    "MCFG: segment {} start bus {:#04x} is above end bus {:#04x}",
                    segment.pci_segment_group_number,
                    segment.start_bus_number,
                    segment.end_bus_number
                );
                return Err(TableGenError::InvalidParameter(
                    "PCI segment start bus must not exceed end bus",
                ));
            }
        }

        let total_len = MCFG_FIXED_LEN + segments.len() * MCFG_ALLOCATION_LEN;
        debug!("MCFG: {total_len} bytes, {} segments", segments.len());
        let mut out = Vec::with_capacity(total_len);
        out.extend_from_slice(&build_sdt_header(
            &self.descriptor,
            table_info,
            cm.info(),
            total_len as u32,
        ));
        out.extend_from_slice(&[0u8; 8]); // reserved

        for segment in segments {
            out.extend_from_slice(&segment.base_address.to_le_bytes());
            out.extend_from_slice(&segment.pci_segment_group_number.to_le_bytes());
            out.push(segment.start_bus_number);
            out.push(segment.end_bus_number);
            out.extend_from_slice(&0u32.to_le_bytes()); // reserved
        }

        debug_assert_eq!(out.len(), total_len);
        Ok(BuiltAcpiTable::generated(finalize_sdt(out)))
    }
}
