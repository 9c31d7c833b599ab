//! MADT (Multiple APIC Description Table) generator for GIC platforms.
//!
//! Emits the ACPI 6.1 GIC interrupt controller structures in the order
//! GICC, GICD, MSI frames, redistributors, ITS.

use dyntab_cm::arm::{
    GicCpuInterfaceInfo, GicDistributorInfo, GicItsInfo, GicMsiFrameInfo, GicRedistributorInfo,
};
use dyntab_cm::{optional_list, required_list, ArmObjectId, CmObjectId, ConfigurationManager};
use dyntab_core::{
    make_revision, AcpiTableGenerator, AcpiTableInfo, BuiltAcpiTable, GeneratorDescriptor,
    GeneratorId, Result, StdAcpiTableId, TableGenError,
};
use log::{debug, error};

use crate::sdt::{build_sdt_header, finalize_sdt, validate_table_info};

const MADT_FIXED_LEN: usize = 44;

const GICC_TYPE: u8 = 0x0B;
const GICC_LEN: usize = 80;
const GICD_TYPE: u8 = 0x0C;
const GICD_LEN: usize = 24;
const GIC_MSI_FRAME_TYPE: u8 = 0x0D;
const GIC_MSI_FRAME_LEN: usize = 24;
const GICR_TYPE: u8 = 0x0E;
const GICR_LEN: usize = 16;
const GIC_ITS_TYPE: u8 = 0x0F;
const GIC_ITS_LEN: usize = 20;

#[derive(Debug)]
pub struct MadtGenerator {
    descriptor: GeneratorDescriptor,
}

impl MadtGenerator {
    pub fn new() -> Self {
        Self {
            descriptor: GeneratorDescriptor {
                id: GeneratorId::std_acpi(StdAcpiTableId::Madt),
                description: "ACPI.STD.MADT.GENERATOR",
                signature: *b"APIC",
                revision: 4,
                creator_id: *b"ARMH",
                creator_revision: make_revision(1, 0),
            },
        }
    }
}

impl Default for MadtGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AcpiTableGenerator for MadtGenerator {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &self.descriptor
    }

    fn build(
        &self,
        table_info: &AcpiTableInfo,
        cm: &dyn ConfigurationManager,
    ) -> Result<BuiltAcpiTable> {
        validate_table_info(&self.descriptor, table_info)?;

        let gicc: &[GicCpuInterfaceInfo] =
            required_list(cm, CmObjectId::arm(ArmObjectId::GicCInfo))?;
        if gicc.is_empty() {
            error!("MADT: platform describes no GIC CPU interfaces");
            return Err(TableGenError::InvalidParameter(
                "at least one GIC CPU interface is required",
            ));
        }
        let gicd: &[GicDistributorInfo] =
            required_list(cm, CmObjectId::arm(ArmObjectId::GicDInfo))?;
        if gicd.is_empty() {
            error!("MADT: platform describes no GIC distributor");
            return Err(TableGenError::InvalidParameter(
                "at least one GIC distributor is required",
            ));
        }
        let msi_frames: &[GicMsiFrameInfo] =
            optional_list(cm, CmObjectId::arm(ArmObjectId::GicMsiFrameInfo))?;
        let gicr: &[GicRedistributorInfo] =
            optional_list(cm, CmObjectId::arm(ArmObjectId::GicRedistributorInfo))?;
        let its: &[GicItsInfo] = optional_list(cm, CmObjectId::arm(ArmObjectId::GicItsInfo))?;

        let total_len = MADT_FIXED_LEN
            + gicc.len() * GICC_LEN
            + gicd.len() * GICD_LEN
            + msi_frames.len() * GIC_MSI_FRAME_LEN
            + gicr.len() * GICR_LEN
            + its.len() * GIC_ITS_LEN;
        debug!(
            "MADT: {total_len} bytes, {} GICC, {} GICD, {} MSI frames, {} GICR, {} ITS",
            gicc.len(),
            gicd.len(),
            msi_frames.len(),
            gicr.len(),
            its.len()
        );

        let mut out = Vec::with_capacity(total_len);
        out.extend_from_slice(&build_sdt_header(
            &self.descriptor,
            table_info,
            cm.info(),
            total_len as u32,
        ));
        // Local interrupt controller address and flags are meaningless for
        // GIC and stay zero.
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());

        for cpu in gicc {
            out.push(GICC_TYPE);
            out.push(GICC_LEN as u8);
            out.extend_from_slice(&0u16.to_le_bytes()); // reserved
            out.extend_from_slice(&cpu.cpu_interface_number.to_le_bytes());
            out.extend_from_slice(&cpu.acpi_processor_uid.to_le_bytes());
            out.extend_from_slice(&cpu.flags.bits().to_le_bytes());
            out.extend_from_slice(&cpu.parking_protocol_version.to_le_bytes());
            out.extend_from_slice(&cpu.performance_interrupt_gsiv.to_le_bytes());
            out.extend_from_slice(&cpu.parked_address.to_le_bytes());
            out.extend_from_slice(&cpu.physical_base_address.to_le_bytes());
            out.extend_from_slice(&cpu.gicv.to_le_bytes());
            out.extend_from_slice(&cpu.gich.to_le_bytes());
            out.extend_from_slice(&cpu.vgic_maintenance_interrupt.to_le_bytes());
            out.extend_from_slice(&cpu.gicr_base_address.to_le_bytes());
            out.extend_from_slice(&cpu.mpidr.to_le_bytes());
            out.push(cpu.processor_power_efficiency_class);
            out.extend_from_slice(&[0u8; 3]); // reserved
        }

        for dist in gicd {
            out.push(GICD_TYPE);
            out.push(GICD_LEN as u8);
            out.extend_from_slice(&0u16.to_le_bytes()); // reserved
            out.extend_from_slice(&dist.gic_id.to_le_bytes());
            out.extend_from_slice(&dist.physical_base_address.to_le_bytes());
            out.extend_from_slice(&dist.system_vector_base.to_le_bytes());
            out.push(dist.gic_version);
            out.extend_from_slice(&[0u8; 3]); // reserved
        }

        for frame in msi_frames {
            out.push(GIC_MSI_FRAME_TYPE);
            out.push(GIC_MSI_FRAME_LEN as u8);
            out.extend_from_slice(&0u16.to_le_bytes()); // reserved
            out.extend_from_slice(&frame.gic_msi_frame_id.to_le_bytes());
            out.extend_from_slice(&frame.physical_base_address.to_le_bytes());
            out.extend_from_slice(&frame.flags.bits().to_le_bytes());
            out.extend_from_slice(&frame.spi_count.to_le_bytes());
            out.extend_from_slice(&frame.spi_base.to_le_bytes());
        }

        for redist in gicr {
            out.push(GICR_TYPE);
            out.push(GICR_LEN as u8);
            out.extend_from_slice(&0u16.to_le_bytes()); // reserved
            out.extend_from_slice(&redist.discovery_range_base_address.to_le_bytes());
            out.extend_from_slice(&redist.discovery_range_length.to_le_bytes());
        }

        for translation_service in its {
            out.push(GIC_ITS_TYPE);
            out.push(GIC_ITS_LEN as u8);
            out.extend_from_slice(&0u16.to_le_bytes()); // reserved
            out.extend_from_slice(&translation_service.gic_its_id.to_le_bytes());
            out.extend_from_slice(&translation_service.physical_base_address.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes()); // reserved
        }

        debug_assert_eq!(out.len(), total_len);
        Ok(BuiltAcpiTable::generated(finalize_sdt(out)))
    }
}
