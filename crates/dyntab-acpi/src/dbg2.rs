//! DBG2 (Debug Port Table 2) generator describing one PL011 debug UART.

use dyntab_cm::arm::SerialPortInfo;
use dyntab_cm::{required_one, ArmObjectId, CmObjectId, ConfigurationManager};
use dyntab_core::{
    make_revision, AcpiTableGenerator, AcpiTableInfo, BuiltAcpiTable, GeneratorDescriptor,
    GeneratorId, Result, StdAcpiTableId,
};

use crate::sdt::{build_sdt_header, finalize_sdt, validate_table_info, Gas};

const DBG2_FIXED_LEN: usize = 44;

const PORT_TYPE_SERIAL: u16 = 0x8000;
const PORT_SUBTYPE_ARM_PL011: u16 = 0x0003;

/// PL011 register window size reported through the address-size array.
const PL011_UART_LENGTH: u32 = 0x1000;

/// ACPI namespace path of the debug port device.
const NAMESPACE_STRING: &[u8] = b"COM1\0";

const DEVICE_INFO_HEADER_LEN: usize = 22;
const BASE_ADDRESS_OFFSET: usize = DEVICE_INFO_HEADER_LEN;
const ADDRESS_SIZE_OFFSET: usize = BASE_ADDRESS_OFFSET + 12;
const NAMESPACE_STRING_OFFSET: usize = ADDRESS_SIZE_OFFSET + 4;
const DEVICE_INFO_LEN: usize = NAMESPACE_STRING_OFFSET + NAMESPACE_STRING.len();

#[derive(Debug)]
pub struct Dbg2Generator {
    descriptor: GeneratorDescriptor,
}

impl Dbg2Generator {
    pub fn new() -> Self {
        Self {
            descriptor: GeneratorDescriptor {
                id: GeneratorId::std_acpi(StdAcpiTableId::Dbg2),
                description: "ACPI.STD.DBG2.GENERATOR",
                signature: *b"DBG2",
                revision: 0,
                creator_id: *b"ARMH",
                creator_revision: make_revision(1, 0),
            },
        }
    }
}

impl Default for Dbg2Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl AcpiTableGenerator for Dbg2Generator {
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
            required_one(cm, CmObjectId::arm(ArmObjectId::SerialDebugPortInfo))?;

        let total_len = DBG2_FIXED_LEN + DEVICE_INFO_LEN;
        let mut out = Vec::with_capacity(total_len);
        out.extend_from_slice(&build_sdt_header(
            &self.descriptor,
            table_info,
            cm.info(),
            total_len as u32,
        ));
        out.extend_from_slice(&(DBG2_FIXED_LEN as u32).to_le_bytes()); // device info offset
        out.extend_from_slice(&1u32.to_le_bytes()); // device count

        // Debug device information structure.
        out.push(0); // revision
        out.extend_from_slice(&(DEVICE_INFO_LEN as u16).to_le_bytes());
        out.push(1); // one generic address register
        out.extend_from_slice(&(NAMESPACE_STRING.len() as u16).to_le_bytes());
        out.extend_from_slice(&(NAMESPACE_STRING_OFFSET as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // OEM data length
        out.extend_from_slice(&0u16.to_le_bytes()); // OEM data offset
        out.extend_from_slice(&PORT_TYPE_SERIAL.to_le_bytes());
        out.extend_from_slice(&PORT_SUBTYPE_ARM_PL011.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // reserved
        out.extend_from_slice(&(BASE_ADDRESS_OFFSET as u16).to_le_bytes());
        out.extend_from_slice(&(ADDRESS_SIZE_OFFSET as u16).to_le_bytes());
        out.extend_from_slice(&Gas::arm_mmio32(port.base_address).as_bytes());
        out.extend_from_slice(&PL011_UART_LENGTH.to_le_bytes());
        out.extend_from_slice(NAMESPACE_STRING);

        debug_assert_eq!(out.len(), total_len);
        Ok(BuiltAcpiTable::generated(finalize_sdt(out)))
    }
}
