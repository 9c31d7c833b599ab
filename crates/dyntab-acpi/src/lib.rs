//! Standard ACPI table generators for ARM platforms.
//!
//! Each generator turns Configuration Manager objects into one finished
//! table blob with the length and checksum already stamped:
//!
//! - [`RawGenerator`]: pre-built blobs (DSDT, SSDT, any fixed table)
//! - [`MadtGenerator`]: GIC interrupt controller topology
//! - [`GtdtGenerator`]: architected timers, GT blocks, SBSA watchdogs
//! - [`Dbg2Generator`]: the PL011 debug UART
//! - [`SpcrGenerator`]: the PL011 console
//! - [`McfgGenerator`]: PCI ECAM segments
//!
//! [`register_standard_generators`] puts the full set into a
//! [`TableFactory`]; platforms add their OEM generators next to them.

mod dbg2;
mod gtdt;
mod madt;
mod mcfg;
mod raw;
mod sdt;
mod spcr;

pub use dbg2::Dbg2Generator;
pub use gtdt::GtdtGenerator;
pub use madt::MadtGenerator;
pub use mcfg::McfgGenerator;
pub use raw::RawGenerator;
pub use spcr::SpcrGenerator;

use dyntab_core::{Result, TableFactory};

/// Register every standard ACPI generator with `factory`.
pub fn register_standard_generators(factory: &mut TableFactory) -> Result<()> {
    factory.register_acpi(Box::new(RawGenerator::new()))?;
    factory.register_acpi(Box::new(MadtGenerator::new()))?;
    factory.register_acpi(Box::new(GtdtGenerator::new()))?;
    factory.register_acpi(Box::new(Dbg2Generator::new()))?;
    factory.register_acpi(Box::new(SpcrGenerator::new()))?;
    factory.register_acpi(Box::new(McfgGenerator::new()))?;
    Ok(())
}

/// A fresh factory with the standard ACPI generators already registered.
pub fn standard_factory() -> Result<TableFactory> {
    let mut factory = TableFactory::new();
    register_standard_generators(&mut factory)?;
    Ok(factory)
}
