use log::debug;

use crate::error::{Result, TableGenError};
use crate::generator::{AcpiTableGenerator, SmbiosTableGenerator};
use crate::id::{GeneratorId, GeneratorNamespace, StdAcpiTableId, StdSmbiosTableId, TableType};

/// Maximum number of OEM ACPI generators registered at once.
pub const MAX_OEM_ACPI_GENERATORS: usize = 16;
/// Maximum number of OEM SMBIOS generators registered at once.
pub const MAX_OEM_SMBIOS_GENERATORS: usize = 16;

struct GeneratorClass<G: ?Sized> {
    /// Standard slots, indexed directly by table ID.
    standard: Vec<Option<Box<G>>>,
    /// OEM generators, capped at `capacity`.
    oem: Vec<(GeneratorId, Box<G>)>,
    oem_capacity: usize,
}

impl<G: ?Sized> GeneratorClass<G> {
    fn new(standard_slots: usize, oem_capacity: usize) -> Self {
        Self {
            standard: (0..standard_slots).map(|_| None).collect(),
            oem: Vec::new(),
            oem_capacity,
        }
    }

    fn register(&mut self, id: GeneratorId, generator: Box<G>) -> Result<()> {
        match id.namespace() {
            GeneratorNamespace::Standard => {
                let slot = self
                    .standard
                    .get_mut(id.table_id() as usize)
                    .ok_or(TableGenError::InvalidParameter(
                        "standard table ID out of range",
                    ))?;
                if slot.is_some() {
                    return Err(TableGenError::AlreadyRegistered(id));
                }
                *slot = Some(generator);
            }
            GeneratorNamespace::Oem => {
                if self.oem.iter().any(|(oem_id, _)| *oem_id == id) {
                    return Err(TableGenError::AlreadyRegistered(id));
                }
                if self.oem.len() >= self.oem_capacity {
                    return Err(TableGenError::OutOfResources(id));
                }
                self.oem.push((id, generator));
            }
        }
        Ok(())
    }

    fn unregister(&mut self, id: GeneratorId) -> Result<Box<G>> {
        match id.namespace() {
            GeneratorNamespace::Standard => self
                .standard
                .get_mut(id.table_id() as usize)
                .and_then(Option::take)
                .ok_or(TableGenError::GeneratorNotFound(id)),
            GeneratorNamespace::Oem => {
                let index = self
                    .oem
                    .iter()
                    .position(|(oem_id, _)| *oem_id == id)
                    .ok_or(TableGenError::GeneratorNotFound(id))?;
                Ok(self.oem.swap_remove(index).1)
            }
        }
    }

    fn lookup(&self, id: GeneratorId) -> Result<&G> {
        let generator = match id.namespace() {
            GeneratorNamespace::Standard => self
                .standard
                .get(id.table_id() as usize)
                .and_then(Option::as_deref),
            GeneratorNamespace::Oem => self
                .oem
                .iter()
                .find(|(oem_id, _)| *oem_id == id)
                .map(|(_, g)| g.as_ref()),
        };
        generator.ok_or(TableGenError::GeneratorNotFound(id))
    }
}

/// The generator registry.
///
/// Generators are grouped into four classes by table type and namespace;
/// each registered generator is addressed by its [`GeneratorId`]. The
/// factory is an owned value, so two firmware stages (or two tests) can
/// hold fully independent registries.
pub struct TableFactory {
    acpi: GeneratorClass<dyn AcpiTableGenerator>,
    smbios: GeneratorClass<dyn SmbiosTableGenerator>,
}

impl TableFactory {
    pub fn new() -> Self {
        Self {
            acpi: GeneratorClass::new(StdAcpiTableId::COUNT, MAX_OEM_ACPI_GENERATORS),
            smbios: GeneratorClass::new(StdSmbiosTableId::COUNT, MAX_OEM_SMBIOS_GENERATORS),
        }
    }

    /// Register an ACPI generator under the ID in its descriptor.
    pub fn register_acpi(&mut self, generator: Box<dyn AcpiTableGenerator>) -> Result<()> {
        let descriptor = generator.descriptor();
        let id = descriptor.id;
        Self::check_type(id, TableType::Acpi)?;
        let description = descriptor.description;
        self.acpi.register(id, generator)?;
        debug!("registered ACPI generator {id}: {description}");
        Ok(())
    }

    pub fn unregister_acpi(&mut self, id: GeneratorId) -> Result<Box<dyn AcpiTableGenerator>> {
        Self::check_type(id, TableType::Acpi)?;
        let generator = self.acpi.unregister(id)?;
        debug!("unregistered ACPI generator {id}");
        Ok(generator)
    }

    pub fn acpi_generator(&self, id: GeneratorId) -> Result<&dyn AcpiTableGenerator> {
        Self::check_type(id, TableType::Acpi)?;
        self.acpi.lookup(id)
    }

    /// Register an SMBIOS generator under the ID in its descriptor.
    pub fn register_smbios(&mut self, generator: Box<dyn SmbiosTableGenerator>) -> Result<()> {
        let descriptor = generator.descriptor();
        let id = descriptor.id;
        Self::check_type(id, TableType::Smbios)?;
        let description = descriptor.description;
        self.smbios.register(id, generator)?;
        debug!("registered SMBIOS generator {id}: {description}");
        Ok(())
    }

    pub fn unregister_smbios(&mut self, id: GeneratorId) -> Result<Box<dyn SmbiosTableGenerator>> {
        Self::check_type(id, TableType::Smbios)?;
        let generator = self.smbios.unregister(id)?;
        debug!("unregistered SMBIOS generator {id}");
        Ok(generator)
    }

    pub fn smbios_generator(&self, id: GeneratorId) -> Result<&dyn SmbiosTableGenerator> {
        Self::check_type(id, TableType::Smbios)?;
        self.smbios.lookup(id)
    }

    fn check_type(id: GeneratorId, expected: TableType) -> Result<()> {
        if id.table_type() != Some(expected) {
            return Err(TableGenError::InvalidParameter(
                "generator ID table type does not match the registry class",
            ));
        }
        Ok(())
    }
}

impl Default for TableFactory {
    fn default() -> Self {
        Self::new()
    }
}
