//! SPCR (Serial Port Console Redirection) generator for a PL011 console.

use dyntab_cm::arm::SerialPortInfo;
use dyntab_cm::{required_one, ArmObjectId, CmObjectId, ConfigurationManager};
use dyntab_core::{
    make_revision, AcpiTableGenerator, AcpiTableInfo, BuiltAcpiTable, GeneratorDescriptor,
    GeneratorId, Result, StdAcpiTableId, TableGenError,
};
use log::error;

use crate::sdt::{build_sdt_header, finalize_sdt, validate_table_info, Gas};

const SPCR_LEN: usize = 80;

const INTERFACE_TYPE_ARM_PL011: u8 = 3;
const INTERRUPT_TYPE_GIC: u8 = 1 << 3;
const TERMINAL_TYPE_ANSI: u8 = 3;

/// SPCR encodes the configured baud rate as an enum, not a number.
fn baud_rate_code(baud_rate: u64) -> Result<u8> {
    match baud_rate {
        9600 => Ok(3),
        19200 => Ok(4),
        57600 => Ok(6),
        115_200 => Ok(7),
        other => {
            error!("SPCR: baud rate {other} has no SPCR encoding");
            Err(TableGenError::Unsupported {
                what: "SPCR baud rate",
                value: other,
            })
        }
    }
}

#[derive(Debug)]
pub struct SpcrGenerator {
    descriptor: GeneratorDescriptor,
}

impl SpcrGenerator {
    pub fn new() -> Self {
        Self {
            descriptor: GeneratorDescriptor {
                id: GeneratorId::std_acpi(StdAcpiTableId::Spcr),
                description: "ACPI.STD.SPCR.GENERATOR",
                signature: *b"SPCR",
                revision: 2,
                creator_id: *b"ARMH",
                creator_revision: make_revision(1, 0),
            },
        }
    }
}

impl Default for SpcrGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AcpiTableGenerator for SpcrGenerator {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &self.descriptor
    }

    fn build(
        &self,
        table_info: &AcpiTableInfo,
        cm: &dyn ConfigurationManager,
    ) -> Result<BuiltAcpiTable> {
        validate_table_info(&self.descriptor, table_info)?;

        let port: &SerialPortInfo =
            required_one(cm, CmObjectId::arm(ArmObjectId::SerialConsolePortInfo))?;
        let baud = baud_rate_code(port.baud_rate)?;

        let mut out = Vec::with_capacity(SPCR_LEN);
        out.extend_from_slice(&build_sdt_header(
            &self.descriptor,
            table_info,
            cm.info(),
            SPCR_LEN as u32,
        ));
        out.push(INTERFACE_TYPE_ARM_PL011);
        out.extend_from_slice(&[0u8; 3]); // reserved
        out.extend_from_slice(&Gas::arm_mmio32(port.base_address).as_bytes());
        out.push(INTERRUPT_TYPE_GIC);
        out.push(0); // legacy PC-AT IRQ, unused with a GIC
        out.extend_from_slice(&port.interrupt.to_le_bytes());
        out.push(baud);
        out.push(0); // parity: none
        out.push(1); // stop bits: 1
        out.push(0); // flow control: none
        out.push(TERMINAL_TYPE_ANSI);
        out.push(0); // reserved
        out.extend_from_slice(&0xFFFFu16.to_le_bytes()); // PCI device ID: not PCI
        out.extend_from_slice(&0xFFFFu16.to_le_bytes()); // PCI vendor ID: not PCI
        out.push(0); // PCI bus
        out.push(0); // PCI device
        out.push(0); // PCI function
        out.extend_from_slice(&0u32.to_le_bytes()); // PCI flags
        out.push(0); // PCI segment
        out.extend_from_slice(&0u32.to_le_bytes()); // reserved

        debug_assert_eq!(out.len(), SPCR_LEN);
        Ok(BuiltAcpiTable::generated(finalize_sdt(out)))
    }
}
