use core::fmt;

/// Table generator class: who implemented it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorNamespace {
    /// Generators shipped with this framework.
    Standard,
    /// Platform/OEM supplied generators.
    Oem,
}

/// The kind of firmware table a generator produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TableType {
    Acpi = 0,
    Smbios = 1,
}

impl TableType {
    fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(Self::Acpi),
            1 => Some(Self::Smbios),
            _ => None,
        }
    }
}

/// Table IDs reserved for the standard ACPI generators.
///
/// The DSDT and SSDT generators are clones of the RAW generator (the table
/// data is pre-built AML either way), so they share its ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StdAcpiTableId {
    Reserved = 0,
    Raw = 1,
    Fadt = 2,
    Madt = 3,
    Gtdt = 4,
    Dbg2 = 5,
    Spcr = 6,
    Mcfg = 7,
}

impl StdAcpiTableId {
    pub const DSDT: Self = Self::Raw;
    pub const SSDT: Self = Self::Raw;

    /// Number of slots in the standard ACPI generator class.
    pub const COUNT: usize = 8;
}

/// Table IDs reserved for the standard SMBIOS generators.
///
/// `TypeNN` tracks the SMBIOS structure type number; types 43-125 are
/// reserved by the SMBIOS specification and have no generator ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StdSmbiosTableId {
    Reserved = 0,
    Raw = 1,
    Type00 = 2,
}

impl StdSmbiosTableId {
    /// Generator ID for SMBIOS structure type `n` (0-42, 126, 127).
    pub fn for_structure_type(n: u8) -> Option<u16> {
        match n {
            0..=42 | 126 | 127 => Some(Self::Type00 as u16 + n as u16),
            _ => None,
        }
    }

    /// Number of slots in the standard SMBIOS generator class
    /// (Reserved + Raw + types 0-127).
    pub const COUNT: usize = 130;
}

/// A composite table generator identifier.
///
/// Packed layout, kept for OEM interoperability and compact logging:
/// bit 31 namespace (0 standard, 1 OEM), bits [30:28] table type,
/// bits [15:0] table ID.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorId(u32);

impl GeneratorId {
    const NAMESPACE_BIT: u32 = 1 << 31;

    pub const fn new(table_type: TableType, namespace: GeneratorNamespace, table_id: u16) -> Self {
        let ns = match namespace {
            GeneratorNamespace::Standard => 0,
            GeneratorNamespace::Oem => Self::NAMESPACE_BIT,
        };
        Self(ns | ((table_type as u32) << 28) | table_id as u32)
    }

    pub const fn std_acpi(id: StdAcpiTableId) -> Self {
        Self::new(TableType::Acpi, GeneratorNamespace::Standard, id as u16)
    }

    pub const fn oem_acpi(table_id: u16) -> Self {
        Self::new(TableType::Acpi, GeneratorNamespace::Oem, table_id)
    }

    pub const fn std_smbios(table_id: u16) -> Self {
        Self::new(TableType::Smbios, GeneratorNamespace::Standard, table_id)
    }

    pub const fn oem_smbios(table_id: u16) -> Self {
        Self::new(TableType::Smbios, GeneratorNamespace::Oem, table_id)
    }

    pub const fn namespace(self) -> GeneratorNamespace {
        if self.0 & Self::NAMESPACE_BIT != 0 {
            GeneratorNamespace::Oem
        } else {
            GeneratorNamespace::Standard
        }
    }

    pub fn table_type(self) -> Option<TableType> {
        TableType::from_bits((self.0 >> 28) & 0x7)
    }

    pub const fn table_id(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeneratorId({:#010x})", self.0)
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Build a `(major, minor)` revision word the way generator descriptors
/// carry it: major in the high 16 bits.
pub const fn make_revision(major: u16, minor: u16) -> u32 {
    ((major as u32) << 16) | minor as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_acpi_ids_pack_as_expected() {
        let id = GeneratorId::std_acpi(StdAcpiTableId::Gtdt);
        assert_eq!(id.raw(), 0x0000_0004);
        assert_eq!(id.namespace(), GeneratorNamespace::Standard);
        assert_eq!(id.table_type(), Some(TableType::Acpi));
        assert_eq!(id.table_id(), StdAcpiTableId::Gtdt as u16);
    }

    #[test]
    fn oem_smbios_ids_pack_as_expected() {
        let id = GeneratorId::oem_smbios(0x1234);
        assert_eq!(id.raw(), 0x9000_1234);
        assert_eq!(id.namespace(), GeneratorNamespace::Oem);
        assert_eq!(id.table_type(), Some(TableType::Smbios));
    }

    #[test]
    fn dsdt_and_ssdt_alias_the_raw_generator() {
        assert_eq!(StdAcpiTableId::DSDT, StdAcpiTableId::Raw);
        assert_eq!(StdAcpiTableId::SSDT, StdAcpiTableId::Raw);
    }

    #[test]
    fn smbios_structure_type_mapping() {
        assert_eq!(StdSmbiosTableId::for_structure_type(0), Some(2));
        assert_eq!(StdSmbiosTableId::for_structure_type(42), Some(44));
        assert_eq!(StdSmbiosTableId::for_structure_type(43), None);
        assert_eq!(StdSmbiosTableId::for_structure_type(127), Some(129));
    }

    #[test]
    fn revision_word() {
        assert_eq!(make_revision(1, 0), 0x0001_0000);
    }
}
