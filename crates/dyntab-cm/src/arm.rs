//! ARM namespace hardware description records.
//!
//! One record type per ARM namespace object ID. Field meanings follow the
//! corresponding structures in the ACPI specification (GICC/GICD/GTDT/MCFG
//! substructures); flag fields use typed [`bitflags`] wrappers whose bit
//! positions match the on-the-wire ACPI encodings exactly.

use bitflags::bitflags;

/// ARM boot architecture flags (the FADT `ARM_BOOT_ARCH` field).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BootArchInfo {
    pub boot_arch_flags: u32,
}

/// Preferred power management profile (the FADT `Preferred_PM_Profile` field).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PowerManagementProfileInfo {
    pub power_management_profile: u8,
}

bitflags! {
    /// GICC structure flags (MADT, ACPI 6.1 table 5-61).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct GicCpuInterfaceFlags: u32 {
        const ENABLED = 1 << 0;
        const PERFORMANCE_INTERRUPT_EDGE = 1 << 1;
        const VGIC_MAINTENANCE_INTERRUPT_EDGE = 1 << 2;
    }
}

bitflags! {
    /// Timer interrupt flags shared by the GTDT fixed timers and the GT
    /// Block frame timers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TimerFlags: u32 {
        const INTERRUPT_EDGE_TRIGGERED = 1 << 0;
        const INTERRUPT_ACTIVE_LOW = 1 << 1;
        const ALWAYS_ON = 1 << 2;
    }
}

bitflags! {
    /// GT Block frame common flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct GtBlockCommonFlags: u32 {
        const SECURE_TIMER = 1 << 0;
        const ALWAYS_ON = 1 << 1;
    }
}

bitflags! {
    /// SBSA generic watchdog flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct WatchdogFlags: u32 {
        const INTERRUPT_EDGE_TRIGGERED = 1 << 0;
        const INTERRUPT_ACTIVE_LOW = 1 << 1;
        const SECURE = 1 << 2;
    }
}

bitflags! {
    /// GIC MSI frame flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MsiFrameFlags: u32 {
        const SPI_SELECT = 1 << 0;
    }
}

/// One GIC CPU interface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GicCpuInterfaceInfo {
    pub cpu_interface_number: u32,
    /// Must match the `_UID` of the CPU device object in the DSDT/SSDT.
    pub acpi_processor_uid: u32,
    pub flags: GicCpuInterfaceFlags,
    pub parking_protocol_version: u32,
    pub performance_interrupt_gsiv: u32,
    pub parked_address: u64,
    pub physical_base_address: u64,
    pub gicv: u64,
    pub gich: u64,
    pub vgic_maintenance_interrupt: u32,
    pub gicr_base_address: u64,
    pub mpidr: u64,
    pub processor_power_efficiency_class: u8,
}

/// The GIC distributor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GicDistributorInfo {
    pub gic_id: u32,
    pub physical_base_address: u64,
    /// Global system interrupt number where this distributor's interrupt
    /// inputs start.
    pub system_vector_base: u32,
    pub gic_version: u8,
}

/// One GIC MSI frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GicMsiFrameInfo {
    pub gic_msi_frame_id: u32,
    pub physical_base_address: u64,
    pub flags: MsiFrameFlags,
    pub spi_count: u16,
    pub spi_base: u16,
}

/// The GIC redistributor discovery range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GicRedistributorInfo {
    pub discovery_range_base_address: u64,
    pub discovery_range_length: u32,
}

/// One GIC interrupt translation service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GicItsInfo {
    pub gic_its_id: u32,
    pub physical_base_address: u64,
}

/// A serial port (console or debug, depending on the object ID it is
/// published under).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerialPortInfo {
    pub base_address: u64,
    pub interrupt: u32,
    pub baud_rate: u64,
    pub clock: u32,
}

/// The per-CPU generic timer (the GTDT fixed part).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenericTimerInfo {
    pub counter_control_base_address: u64,
    pub counter_read_base_address: u64,
    pub secure_pl1_timer_gsiv: u32,
    pub secure_pl1_timer_flags: TimerFlags,
    pub non_secure_pl1_timer_gsiv: u32,
    pub non_secure_pl1_timer_flags: TimerFlags,
    pub virtual_timer_gsiv: u32,
    pub virtual_timer_flags: TimerFlags,
    pub non_secure_pl2_timer_gsiv: u32,
    pub non_secure_pl2_timer_flags: TimerFlags,
}

/// One timer frame inside a memory-mapped GT Block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GtBlockTimerFrameInfo {
    /// Frame number, 0-7.
    pub frame_number: u8,
    pub cnt_base_address: u64,
    pub cnt_el0_base_address: u64,
    pub physical_timer_gsiv: u32,
    pub physical_timer_flags: TimerFlags,
    pub virtual_timer_gsiv: u32,
    pub virtual_timer_flags: TimerFlags,
    pub common_flags: GtBlockCommonFlags,
}

/// One memory-mapped GT Block and its timer frames.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GtBlockInfo {
    pub physical_base_address: u64,
    pub timer_frames: Vec<GtBlockTimerFrameInfo>,
}

/// One SBSA generic watchdog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenericWatchdogInfo {
    pub control_frame_address: u64,
    pub refresh_frame_address: u64,
    pub timer_gsiv: u32,
    pub flags: WatchdogFlags,
}

/// One PCI configuration space (ECAM) segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PciConfigSpaceInfo {
    pub base_address: u64,
    pub pci_segment_group_number: u16,
    pub start_bus_number: u8,
    pub end_bus_number: u8,
}

/// The hypervisor vendor identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HypervisorVendorId {
    pub hypervisor_vendor_id: u64,
}
