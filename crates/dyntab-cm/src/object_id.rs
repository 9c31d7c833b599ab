use core::fmt;

/// Namespaces for Configuration Manager objects.
///
/// The numeric values follow the packed object-ID layout: bits [31:28] of a
/// [`CmObjectId`] carry the namespace, bits [7:0] the per-namespace object ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CmNamespace {
    Standard = 0x0,
    Arm = 0x1,
    Oem = 0x8,
}

impl CmNamespace {
    fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0x0 => Some(Self::Standard),
            0x1 => Some(Self::Arm),
            0x8 => Some(Self::Oem),
            _ => None,
        }
    }
}

/// Object IDs in the Standard namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StdObjectId {
    ConfigurationManagerInfo = 0,
    AcpiTableList = 1,
    SmbiosTableList = 2,
}

/// Object IDs in the ARM namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ArmObjectId {
    Reserved = 0,
    BootArchInfo = 1,
    CpuInfo = 2,
    PowerManagementProfileInfo = 3,
    GicCInfo = 4,
    GicDInfo = 5,
    GicMsiFrameInfo = 6,
    GicRedistributorInfo = 7,
    GicItsInfo = 8,
    SerialConsolePortInfo = 9,
    SerialDebugPortInfo = 10,
    GenericTimerInfo = 11,
    PlatformGtBlockInfo = 12,
    PlatformGenericWatchdogInfo = 13,
    PciConfigSpaceInfo = 14,
    HypervisorVendorIdentity = 15,
}

/// A namespace-qualified Configuration Manager object identifier.
///
/// Packed layout: bits [31:28] namespace, bits [27:8] reserved (zero),
/// bits [7:0] object ID within the namespace.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CmObjectId(u32);

impl CmObjectId {
    pub const fn new(namespace: CmNamespace, object_id: u8) -> Self {
        Self(((namespace as u32) << 28) | object_id as u32)
    }

    pub const fn standard(id: StdObjectId) -> Self {
        Self::new(CmNamespace::Standard, id as u8)
    }

    pub const fn arm(id: ArmObjectId) -> Self {
        Self::new(CmNamespace::Arm, id as u8)
    }

    pub const fn oem(object_id: u8) -> Self {
        Self::new(CmNamespace::Oem, object_id)
    }

    pub fn namespace(self) -> Option<CmNamespace> {
        CmNamespace::from_bits((self.0 >> 28) & 0xF)
    }

    pub const fn object_id(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for CmObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CmObjectId({:#010x})", self.0)
    }
}

impl fmt::Display for CmObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace() {
            Some(ns) => write!(f, "{:?}:{}", ns, self.object_id()),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}
