use std::collections::BTreeMap;

use crate::arm::{
    BootArchInfo, GenericTimerInfo, GenericWatchdogInfo, GicCpuInterfaceInfo, GicDistributorInfo,
    GicItsInfo, GicMsiFrameInfo, GicRedistributorInfo, GtBlockInfo, HypervisorVendorId,
    PciConfigSpaceInfo, PowerManagementProfileInfo, SerialPortInfo,
};
use crate::error::CmError;
use crate::object_id::CmObjectId;

/// Identity of the Configuration Manager, used to stamp OEM fields into
/// generated table headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigurationManagerInfo {
    pub revision: u32,
    pub oem_id: [u8; 6],
}

impl Default for ConfigurationManagerInfo {
    fn default() -> Self {
        Self {
            revision: 1,
            oem_id: *b"DYNTAB",
        }
    }
}

/// A typed Configuration Manager object: one record list per variant.
///
/// The two serial port objects (console and debug) share the record type
/// and differ only in the ID they are published under.
#[derive(Clone, Debug, PartialEq)]
pub enum CmObject {
    BootArch(Vec<BootArchInfo>),
    PowerManagementProfile(Vec<PowerManagementProfileInfo>),
    GicCpuInterface(Vec<GicCpuInterfaceInfo>),
    GicDistributor(Vec<GicDistributorInfo>),
    GicMsiFrame(Vec<GicMsiFrameInfo>),
    GicRedistributor(Vec<GicRedistributorInfo>),
    GicIts(Vec<GicItsInfo>),
    SerialPort(Vec<SerialPortInfo>),
    GenericTimer(Vec<GenericTimerInfo>),
    GtBlock(Vec<GtBlockInfo>),
    GenericWatchdog(Vec<GenericWatchdogInfo>),
    PciConfigSpace(Vec<PciConfigSpaceInfo>),
    HypervisorVendor(Vec<HypervisorVendorId>),
}

/// The query interface consumed by table generators.
///
/// Implementations own the platform description; generators borrow objects
/// for the duration of one build call and never mutate them.
pub trait ConfigurationManager {
    fn info(&self) -> &ConfigurationManagerInfo;

    /// Look up the object registered under `id`, or `None` if the platform
    /// does not describe it.
    fn object(&self, id: CmObjectId) -> Option<&CmObject>;
}

/// A record type that can be extracted from a [`CmObject`] variant.
///
/// This is the typed-getter seam: generators ask for `&[T]` under an
/// explicit object ID and the extraction fails if the registered object
/// carries a different record type.
pub trait CmRecord: Sized {
    fn extract(object: &CmObject) -> Option<&[Self]>;
}

macro_rules! impl_cm_record {
    ($record:ty, $($variant:ident),+) => {
        impl CmRecord for $record {
            fn extract(object: &CmObject) -> Option<&[Self]> {
                match object {
                    $(CmObject::$variant(list) => Some(list.as_slice()),)+
                    _ => None,
                }
            }
        }
    };
}

impl_cm_record!(BootArchInfo, BootArch);
impl_cm_record!(PowerManagementProfileInfo, PowerManagementProfile);
impl_cm_record!(GicCpuInterfaceInfo, GicCpuInterface);
impl_cm_record!(GicDistributorInfo, GicDistributor);
impl_cm_record!(GicMsiFrameInfo, GicMsiFrame);
impl_cm_record!(GicRedistributorInfo, GicRedistributor);
impl_cm_record!(GicItsInfo, GicIts);
impl_cm_record!(SerialPortInfo, SerialPort);
impl_cm_record!(GenericTimerInfo, GenericTimer);
impl_cm_record!(GtBlockInfo, GtBlock);
impl_cm_record!(GenericWatchdogInfo, GenericWatchdog);
impl_cm_record!(PciConfigSpaceInfo, PciConfigSpace);
impl_cm_record!(HypervisorVendorId, HypervisorVendor);

/// Fetch a record list that the caller cannot proceed without.
pub fn required_list<'a, T: CmRecord>(
    cm: &'a dyn ConfigurationManager,
    id: CmObjectId,
) -> Result<&'a [T], CmError> {
    let object = cm.object(id).ok_or(CmError::NotFound(id))?;
    T::extract(object).ok_or(CmError::ObjectMismatch(id))
}

/// Fetch a record list that may legitimately be absent; a missing object
/// contributes zero entries.
pub fn optional_list<'a, T: CmRecord>(
    cm: &'a dyn ConfigurationManager,
    id: CmObjectId,
) -> Result<&'a [T], CmError> {
    match cm.object(id) {
        None => Ok(&[]),
        Some(object) => T::extract(object).ok_or(CmError::ObjectMismatch(id)),
    }
}

/// Fetch the single record of an object that must exist and be non-empty.
pub fn required_one<'a, T: CmRecord>(
    cm: &'a dyn ConfigurationManager,
    id: CmObjectId,
) -> Result<&'a T, CmError> {
    required_list::<T>(cm, id)?
        .first()
        .ok_or(CmError::EmptyObject(id))
}

/// A map-backed [`ConfigurationManager`] for platforms that assemble their
/// description in memory, and for tests.
#[derive(Clone, Debug, Default)]
pub struct PlatformDescription {
    info: ConfigurationManagerInfo,
    objects: BTreeMap<CmObjectId, CmObject>,
}

impl PlatformDescription {
    pub fn new(info: ConfigurationManagerInfo) -> Self {
        Self {
            info,
            objects: BTreeMap::new(),
        }
    }

    /// Register an object, replacing any previous object under the same ID.
    pub fn set_object(&mut self, id: CmObjectId, object: CmObject) -> &mut Self {
        self.objects.insert(id, object);
        self
    }

    pub fn remove_object(&mut self, id: CmObjectId) -> Option<CmObject> {
        self.objects.remove(&id)
    }
}

impl ConfigurationManager for PlatformDescription {
    fn info(&self) -> &ConfigurationManagerInfo {
        &self.info
    }

    fn object(&self, id: CmObjectId) -> Option<&CmObject> {
        self.objects.get(&id)
    }
}
