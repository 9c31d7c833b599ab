//! System Description Table header plumbing shared by all generators.

use dyntab_cm::ConfigurationManagerInfo;
use dyntab_core::{AcpiTableInfo, GeneratorDescriptor, Result, TableGenError};

pub(crate) fn checksum(data: &[u8]) -> u8 {
    let sum: u8 = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    (0u8).wrapping_sub(sum)
}

/// Check a build request against the generator it was dispatched to.
///
/// The table list names a generator ID plus the signature/revision the
/// platform expects; a mismatch means the list entry and the registered
/// generator disagree and the build must not proceed.
pub(crate) fn validate_table_info(
    descriptor: &GeneratorDescriptor,
    table_info: &AcpiTableInfo,
) -> Result<()> {
    if table_info.generator_id != descriptor.id {
        log::error!(
            "requested generator {} but dispatched to {}",
            table_info.generator_id,
            descriptor.id
        );
        return Err(TableGenError::InvalidParameter(
            "table info generator ID does not match this generator",
        ));
    }
    if descriptor.signature != [0; 4] && table_info.signature != descriptor.signature {
        return Err(TableGenError::SignatureMismatch {
            expected: descriptor.signature,
            requested: table_info.signature,
        });
    }
    if descriptor.revision != 0 && table_info.revision != descriptor.revision {
        return Err(TableGenError::RevisionMismatch {
            expected: descriptor.revision,
            requested: table_info.revision,
        });
    }
    Ok(())
}

pub(crate) fn build_sdt_header(
    descriptor: &GeneratorDescriptor,
    table_info: &AcpiTableInfo,
    cm_info: &ConfigurationManagerInfo,
    total_len: u32,
) -> [u8; 36] {
    // A zero OEM table ID in the table list means "derive one": low half
    // from the OEM ID, high half from the table signature.
    let oem_table_id = if table_info.oem_table_id != 0 {
        table_info.oem_table_id
    } else {
        let mut derived = [0u8; 8];
        derived[0..4].copy_from_slice(&cm_info.oem_id[0..4]);
        derived[4..8].copy_from_slice(&descriptor.signature);
        u64::from_le_bytes(derived)
    };
    let oem_revision = if table_info.oem_revision != 0 {
        table_info.oem_revision
    } else {
        cm_info.revision
    };

    let mut out = [0u8; 36];
    out[0..4].copy_from_slice(&descriptor.signature);
    out[4..8].copy_from_slice(&total_len.to_le_bytes());
    out[8] = table_info.revision;
    out[9] = 0; // checksum to be filled in
    out[10..16].copy_from_slice(&cm_info.oem_id);
    out[16..24].copy_from_slice(&oem_table_id.to_le_bytes());
    out[24..28].copy_from_slice(&oem_revision.to_le_bytes());
    out[28..32].copy_from_slice(&descriptor.creator_id);
    out[32..36].copy_from_slice(&descriptor.creator_revision.to_le_bytes());
    out
}

pub(crate) fn finalize_sdt(mut table: Vec<u8>) -> Vec<u8> {
    debug_assert!(table.len() >= 36);
    debug_assert_eq!(
        u32::from_le_bytes(table[4..8].try_into().unwrap()) as usize,
        table.len()
    );
    table[9] = 0;
    let csum = checksum(&table);
    table[9] = csum;
    table
}

/// ACPI Generic Address Structure.
#[derive(Clone, Copy)]
pub(crate) struct Gas {
    address_space_id: u8,
    register_bit_width: u8,
    register_bit_offset: u8,
    access_size: u8,
    address: u64,
}

impl Gas {
    /// 32-bit memory-mapped register block with dword access, the encoding
    /// ARM serial port tables use for their base address.
    pub(crate) fn arm_mmio32(address: u64) -> Self {
        Self {
            address_space_id: 0, // System Memory
            register_bit_width: 32,
            register_bit_offset: 0,
            access_size: 3, // dword
            address,
        }
    }

    pub(crate) fn as_bytes(&self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out[0] = self.address_space_id;
        out[1] = self.register_bit_width;
        out[2] = self.register_bit_offset;
        out[3] = self.access_size;
        out[4..12].copy_from_slice(&self.address.to_le_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyntab_core::{make_revision, GeneratorId, StdAcpiTableId};

    fn descriptor() -> GeneratorDescriptor {
        GeneratorDescriptor {
            id: GeneratorId::std_acpi(StdAcpiTableId::Mcfg),
            description: "TEST",
            signature: *b"MCFG",
            revision: 1,
            creator_id: *b"ARMH",
            creator_revision: make_revision(1, 0),
        }
    }

    fn table_info() -> AcpiTableInfo {
        AcpiTableInfo {
            signature: *b"MCFG",
            revision: 1,
            generator_id: GeneratorId::std_acpi(StdAcpiTableId::Mcfg),
            oem_table_id: 0,
            oem_revision: 0,
            table_data: None,
        }
    }

    #[test]
    fn checksum_makes_the_byte_sum_zero() {
        let data = vec![0x12u8, 0x34, 0x56];
        let csum = checksum(&data);
        let total: u8 = data
            .iter()
            .chain(std::iter::once(&csum))
            .fold(0u8, |acc, &b| acc.wrapping_add(b));
        assert_eq!(total, 0);
    }

    #[test]
    fn header_carries_oem_identity() {
        let cm_info = ConfigurationManagerInfo {
            revision: 7,
            oem_id: *b"OEMIDX",
        };
        let header = build_sdt_header(&descriptor(), &table_info(), &cm_info, 36);
        assert_eq!(&header[0..4], b"MCFG");
        assert_eq!(u32::from_le_bytes(header[4..8].try_into().unwrap()), 36);
        assert_eq!(header[8], 1);
        assert_eq!(&header[10..16], b"OEMIDX");
        // Derived OEM table ID: OEM ID prefix in the low half, signature in
        // the high half.
        assert_eq!(&header[16..20], b"OEMI");
        assert_eq!(&header[20..24], b"MCFG");
        assert_eq!(u32::from_le_bytes(header[24..28].try_into().unwrap()), 7);
        assert_eq!(&header[28..32], b"ARMH");
    }

    #[test]
    fn explicit_oem_fields_are_preserved() {
        let cm_info = ConfigurationManagerInfo::default();
        let info = AcpiTableInfo {
            oem_table_id: u64::from_le_bytes(*b"TABLEID\0"),
            oem_revision: 3,
            ..table_info()
        };
        let header = build_sdt_header(&descriptor(), &info, &cm_info, 36);
        assert_eq!(&header[16..24], b"TABLEID\0");
        assert_eq!(u32::from_le_bytes(header[24..28].try_into().unwrap()), 3);
    }

    #[test]
    fn mismatched_signature_is_rejected() {
        let info = AcpiTableInfo {
            signature: *b"APIC",
            ..table_info()
        };
        assert_eq!(
            validate_table_info(&descriptor(), &info).unwrap_err(),
            TableGenError::SignatureMismatch {
                expected: *b"MCFG",
                requested: *b"APIC",
            }
        );
    }

    #[test]
    fn mismatched_revision_is_rejected() {
        let info = AcpiTableInfo {
            revision: 2,
            ..table_info()
        };
        assert_eq!(
            validate_table_info(&descriptor(), &info).unwrap_err(),
            TableGenError::RevisionMismatch {
                expected: 1,
                requested: 2,
            }
        );
    }

    #[test]
    fn finalize_zeroes_the_running_sum() {
        let cm_info = ConfigurationManagerInfo::default();
        let table = finalize_sdt(build_sdt_header(&descriptor(), &table_info(), &cm_info, 36).to_vec());
        let total: u8 = table.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        assert_eq!(total, 0);
    }
}
