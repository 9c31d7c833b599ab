use std::sync::Arc;

use dyntab_acpi::standard_factory;
use dyntab_cm::arm::{
    GenericTimerInfo, GenericWatchdogInfo, GicCpuInterfaceFlags, GicCpuInterfaceInfo,
    GicDistributorInfo, GicItsInfo, GicMsiFrameInfo, GicRedistributorInfo, GtBlockInfo,
    GtBlockTimerFrameInfo, MsiFrameFlags, PciConfigSpaceInfo, SerialPortInfo, TimerFlags,
};
use dyntab_cm::{ArmObjectId, CmObject, CmObjectId, PlatformDescription};
use dyntab_core::{AcpiTableInfo, GeneratorId, StdAcpiTableId};

fn read_u16_le(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes(buf[off..off + 2].try_into().unwrap())
}

fn read_u32_le(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes(buf[off..off + 4].try_into().unwrap())
}

fn read_u64_le(buf: &[u8], off: usize) -> u64 {
    u64::from_le_bytes(buf[off..off + 8].try_into().unwrap())
}

fn assert_valid_sdt(table: &[u8], signature: &[u8; 4]) {
    assert_eq!(&table[0..4], signature);
    assert_eq!(read_u32_le(table, 4) as usize, table.len());
    let sum: u8 = table.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    assert_eq!(sum, 0, "table byte sum must be zero");
}

fn table_info(signature: [u8; 4], revision: u8, id: StdAcpiTableId) -> AcpiTableInfo {
    AcpiTableInfo {
        signature,
        revision,
        generator_id: GeneratorId::std_acpi(id),
        oem_table_id: 0,
        oem_revision: 0,
        table_data: None,
    }
}

fn platform() -> PlatformDescription {
    let mut platform = PlatformDescription::default();
    platform.set_object(
        CmObjectId::arm(ArmObjectId::GicCInfo),
        CmObject::GicCpuInterface(vec![
            GicCpuInterfaceInfo {
                cpu_interface_number: 0,
                acpi_processor_uid: 0,
                flags: GicCpuInterfaceFlags::ENABLED,
                performance_interrupt_gsiv: 23,
                physical_base_address: 0x2c00_0000,
                gicv: 0x2c06_0000,
                gich: 0x2c04_0000,
                vgic_maintenance_interrupt: 25,
                gicr_base_address: 0x2f10_0000,
                mpidr: 0x0000,
                ..GicCpuInterfaceInfo::default()
            },
            GicCpuInterfaceInfo {
                cpu_interface_number: 1,
                acpi_processor_uid: 1,
                flags: GicCpuInterfaceFlags::ENABLED,
                performance_interrupt_gsiv: 23,
                physical_base_address: 0x2c00_0000,
                mpidr: 0x0001,
                ..GicCpuInterfaceInfo::default()
            },
        ]),
    );
    platform.set_object(
        CmObjectId::arm(ArmObjectId::GicDInfo),
        CmObject::GicDistributor(vec![GicDistributorInfo {
            gic_id: 0,
            physical_base_address: 0x2f00_0000,
            system_vector_base: 0,
            gic_version: 3,
        }]),
    );
    platform.set_object(
        CmObjectId::arm(ArmObjectId::GicMsiFrameInfo),
        CmObject::GicMsiFrame(vec![GicMsiFrameInfo {
            gic_msi_frame_id: 0,
            physical_base_address: 0x2e00_0000,
            flags: MsiFrameFlags::SPI_SELECT,
            spi_count: 64,
            spi_base: 96,
        }]),
    );
    platform.set_object(
        CmObjectId::arm(ArmObjectId::GicRedistributorInfo),
        CmObject::GicRedistributor(vec![GicRedistributorInfo {
            discovery_range_base_address: 0x2f10_0000,
            discovery_range_length: 0x20_0000,
        }]),
    );
    platform.set_object(
        CmObjectId::arm(ArmObjectId::GicItsInfo),
        CmObject::GicIts(vec![GicItsInfo {
            gic_its_id: 0,
            physical_base_address: 0x2f02_0000,
        }]),
    );
    platform.set_object(
        CmObjectId::arm(ArmObjectId::GenericTimerInfo),
        CmObject::GenericTimer(vec![GenericTimerInfo {
            counter_control_base_address: 0x2a43_0000,
            counter_read_base_address: 0x2a80_0000,
            secure_pl1_timer_gsiv: 29,
            secure_pl1_timer_flags: TimerFlags::ALWAYS_ON,
            non_secure_pl1_timer_gsiv: 30,
            non_secure_pl1_timer_flags: TimerFlags::ALWAYS_ON,
            virtual_timer_gsiv: 27,
            virtual_timer_flags: TimerFlags::ALWAYS_ON,
            non_secure_pl2_timer_gsiv: 26,
            non_secure_pl2_timer_flags: TimerFlags::ALWAYS_ON,
        }]),
    );
    platform.set_object(
        CmObjectId::arm(ArmObjectId::PlatformGtBlockInfo),
        CmObject::GtBlock(vec![GtBlockInfo {
            physical_base_address: 0x2a81_0000,
            timer_frames: vec![
                GtBlockTimerFrameInfo {
                    frame_number: 0,
                    cnt_base_address: 0x2a82_0000,
                    cnt_el0_base_address: 0x2a83_0000,
                    physical_timer_gsiv: 60,
                    virtual_timer_gsiv: 61,
                    ..GtBlockTimerFrameInfo::default()
                },
                GtBlockTimerFrameInfo {
                    frame_number: 1,
                    cnt_base_address: 0x2a84_0000,
                    cnt_el0_base_address: 0x2a85_0000,
                    physical_timer_gsiv: 62,
                    virtual_timer_gsiv: 63,
                    ..GtBlockTimerFrameInfo::default()
                },
            ],
        }]),
    );
    platform.set_object(
        CmObjectId::arm(ArmObjectId::PlatformGenericWatchdogInfo),
        CmObject::GenericWatchdog(vec![GenericWatchdogInfo {
            control_frame_address: 0x2a44_0000,
            refresh_frame_address: 0x2a45_0000,
            timer_gsiv: 93,
            ..GenericWatchdogInfo::default()
        }]),
    );
    platform.set_object(
        CmObjectId::arm(ArmObjectId::PciConfigSpaceInfo),
        CmObject::PciConfigSpace(vec![PciConfigSpaceInfo {
            base_address: 0x4000_0000,
            pci_segment_group_number: 0,
            start_bus_number: 0,
            end_bus_number: 255,
        }]),
    );
    let uart = SerialPortInfo {
        base_address: 0x1c09_0000,
        interrupt: 37,
        baud_rate: 115_200,
        clock: 24_000_000,
    };
    platform.set_object(
        CmObjectId::arm(ArmObjectId::SerialConsolePortInfo),
        CmObject::SerialPort(vec![uart]),
    );
    platform.set_object(
        CmObjectId::arm(ArmObjectId::SerialDebugPortInfo),
        CmObject::SerialPort(vec![SerialPortInfo {
            base_address: 0x1c0a_0000,
            interrupt: 38,
            ..uart
        }]),
    );
    platform
}

#[test]
fn madt_layout() {
    let factory = standard_factory().unwrap();
    let platform = platform();
    let info = table_info(*b"APIC", 4, StdAcpiTableId::Madt);
    let generator = factory.acpi_generator(info.generator_id).unwrap();
    let table = generator.build(&info, &platform).unwrap();
    let bytes = table.as_bytes();

    // 44 fixed + 2 GICC + GICD + MSI frame + GICR + ITS.
    assert_eq!(bytes.len(), 44 + 2 * 80 + 24 + 24 + 16 + 20);
    assert_valid_sdt(bytes, b"APIC");
    assert_eq!(bytes[8], 4); // revision
    assert_eq!(read_u32_le(bytes, 36), 0); // local intr ctrl address
    assert_eq!(read_u32_le(bytes, 40), 0); // flags

    // First GICC.
    assert_eq!(bytes[44], 0x0B);
    assert_eq!(bytes[45], 80);
    assert_eq!(read_u32_le(bytes, 48), 0); // CPU interface number
    assert_eq!(read_u32_le(bytes, 56), 1); // flags: enabled
    assert_eq!(read_u64_le(bytes, 76), 0x2c00_0000); // physical base
    assert_eq!(read_u64_le(bytes, 104), 0x2f10_0000); // GICR base
    assert_eq!(read_u64_le(bytes, 112), 0); // MPIDR

    // Second GICC.
    assert_eq!(bytes[124], 0x0B);
    assert_eq!(read_u32_le(bytes, 128), 1);
    assert_eq!(read_u64_le(bytes, 192), 1); // MPIDR

    // GICD.
    let gicd = 44 + 2 * 80;
    assert_eq!(bytes[gicd], 0x0C);
    assert_eq!(bytes[gicd + 1], 24);
    assert_eq!(read_u64_le(bytes, gicd + 8), 0x2f00_0000);
    assert_eq!(bytes[gicd + 20], 3); // GIC version

    // MSI frame.
    let msi = gicd + 24;
    assert_eq!(bytes[msi], 0x0D);
    assert_eq!(read_u64_le(bytes, msi + 8), 0x2e00_0000);
    assert_eq!(read_u32_le(bytes, msi + 16), 1); // SPI select
    assert_eq!(read_u16_le(bytes, msi + 20), 64);
    assert_eq!(read_u16_le(bytes, msi + 22), 96);

    // Redistributor.
    let gicr = msi + 24;
    assert_eq!(bytes[gicr], 0x0E);
    assert_eq!(read_u64_le(bytes, gicr + 4), 0x2f10_0000);
    assert_eq!(read_u32_le(bytes, gicr + 12), 0x20_0000);

    // ITS.
    let its = gicr + 16;
    assert_eq!(bytes[its], 0x0F);
    assert_eq!(read_u32_le(bytes, its + 4), 0);
    assert_eq!(read_u64_le(bytes, its + 8), 0x2f02_0000);

    generator.free(&info, table).unwrap();
}

#[test]
fn madt_emits_every_distributor() {
    let factory = standard_factory().unwrap();
    let mut platform = platform();
    platform.set_object(
        CmObjectId::arm(ArmObjectId::GicDInfo),
        CmObject::GicDistributor(vec![
            GicDistributorInfo {
                gic_id: 0,
                physical_base_address: 0x2f00_0000,
                system_vector_base: 0,
                gic_version: 3,
            },
            GicDistributorInfo {
                gic_id: 1,
                physical_base_address: 0x2f80_0000,
                system_vector_base: 288,
                gic_version: 3,
            },
        ]),
    );
    let info = table_info(*b"APIC", 4, StdAcpiTableId::Madt);
    let generator = factory.acpi_generator(info.generator_id).unwrap();
    let table = generator.build(&info, &platform).unwrap();
    let bytes = table.as_bytes();

    assert_eq!(bytes.len(), 44 + 2 * 80 + 2 * 24 + 24 + 16 + 20);
    assert_valid_sdt(bytes, b"APIC");

    let first = 44 + 2 * 80;
    assert_eq!(bytes[first], 0x0C);
    assert_eq!(read_u32_le(bytes, first + 4), 0);
    assert_eq!(read_u64_le(bytes, first + 8), 0x2f00_0000);

    let second = first + 24;
    assert_eq!(bytes[second], 0x0C);
    assert_eq!(read_u32_le(bytes, second + 4), 1);
    assert_eq!(read_u64_le(bytes, second + 8), 0x2f80_0000);
    assert_eq!(read_u32_le(bytes, second + 16), 288);

    // The MSI frame follows the last distributor.
    assert_eq!(bytes[second + 24], 0x0D);
}

#[test]
fn gtdt_layout_with_platform_timers() {
    let factory = standard_factory().unwrap();
    let platform = platform();
    let info = table_info(*b"GTDT", 2, StdAcpiTableId::Gtdt);
    let generator = factory.acpi_generator(info.generator_id).unwrap();
    let table = generator.build(&info, &platform).unwrap();
    let bytes = table.as_bytes();

    // 96 fixed + GT block with two frames + watchdog.
    assert_eq!(bytes.len(), 96 + (20 + 2 * 40) + 28);
    assert_valid_sdt(bytes, b"GTDT");
    assert_eq!(read_u64_le(bytes, 36), 0x2a43_0000); // CntControlBase
    assert_eq!(read_u32_le(bytes, 48), 29); // secure EL1 GSIV
    assert_eq!(read_u32_le(bytes, 64), 27); // virtual timer GSIV
    assert_eq!(read_u64_le(bytes, 80), 0x2a80_0000); // CntReadBase
    assert_eq!(read_u32_le(bytes, 88), 2); // platform timer count
    assert_eq!(read_u32_le(bytes, 92), 96); // platform timer offset

    // GT block.
    assert_eq!(bytes[96], 0);
    assert_eq!(read_u16_le(bytes, 97) as usize, 20 + 2 * 40);
    assert_eq!(read_u64_le(bytes, 100), 0x2a81_0000);
    assert_eq!(read_u32_le(bytes, 108), 2); // frame count
    assert_eq!(read_u32_le(bytes, 112), 20); // frame offset

    // Frames.
    let frame0 = 96 + 20;
    assert_eq!(bytes[frame0], 0);
    assert_eq!(read_u64_le(bytes, frame0 + 4), 0x2a82_0000);
    assert_eq!(read_u32_le(bytes, frame0 + 20), 60);
    let frame1 = frame0 + 40;
    assert_eq!(bytes[frame1], 1);
    assert_eq!(read_u64_le(bytes, frame1 + 4), 0x2a84_0000);

    // Watchdog: refresh frame first, then control frame.
    let wd = 96 + 20 + 2 * 40;
    assert_eq!(bytes[wd], 1);
    assert_eq!(read_u16_le(bytes, wd + 1), 28);
    assert_eq!(read_u64_le(bytes, wd + 4), 0x2a45_0000);
    assert_eq!(read_u64_le(bytes, wd + 12), 0x2a44_0000);
    assert_eq!(read_u32_le(bytes, wd + 20), 93);

    generator.free(&info, table).unwrap();
}

#[test]
fn gtdt_without_platform_timers_has_zero_offset() {
    let factory = standard_factory().unwrap();
    let mut platform = platform();
    platform.remove_object(CmObjectId::arm(ArmObjectId::PlatformGtBlockInfo));
    platform.remove_object(CmObjectId::arm(ArmObjectId::PlatformGenericWatchdogInfo));
    let info = table_info(*b"GTDT", 2, StdAcpiTableId::Gtdt);
    let generator = factory.acpi_generator(info.generator_id).unwrap();
    let table = generator.build(&info, &platform).unwrap();
    let bytes = table.as_bytes();

    assert_eq!(bytes.len(), 96);
    assert_valid_sdt(bytes, b"GTDT");
    assert_eq!(read_u32_le(bytes, 88), 0);
    assert_eq!(read_u32_le(bytes, 92), 0);
}

#[test]
fn gtdt_accepts_a_gt_block_without_frames() {
    let factory = standard_factory().unwrap();
    let mut platform = platform();
    platform.set_object(
        CmObjectId::arm(ArmObjectId::PlatformGtBlockInfo),
        CmObject::GtBlock(vec![GtBlockInfo {
            physical_base_address: 0x2a81_0000,
            timer_frames: Vec::new(),
        }]),
    );
    platform.remove_object(CmObjectId::arm(ArmObjectId::PlatformGenericWatchdogInfo));
    let info = table_info(*b"GTDT", 2, StdAcpiTableId::Gtdt);
    let generator = factory.acpi_generator(info.generator_id).unwrap();
    let table = generator.build(&info, &platform).unwrap();
    let bytes = table.as_bytes();

    assert_eq!(bytes.len(), 96 + 20);
    assert_valid_sdt(bytes, b"GTDT");
    assert_eq!(read_u32_le(bytes, 88), 1); // platform timer count
    assert_eq!(read_u32_le(bytes, 92), 96); // platform timer offset
    assert_eq!(bytes[96], 0); // GT block type
    assert_eq!(read_u16_le(bytes, 97), 20); // block length, no frames
    assert_eq!(read_u32_le(bytes, 108), 0); // frame count
}

#[test]
fn mcfg_layout() {
    let factory = standard_factory().unwrap();
    let platform = platform();
    let info = table_info(*b"MCFG", 1, StdAcpiTableId::Mcfg);
    let generator = factory.acpi_generator(info.generator_id).unwrap();
    let table = generator.build(&info, &platform).unwrap();
    let bytes = table.as_bytes();

    assert_eq!(bytes.len(), 44 + 16);
    assert_valid_sdt(bytes, b"MCFG");
    assert_eq!(read_u64_le(bytes, 36), 0); // reserved
    assert_eq!(read_u64_le(bytes, 44), 0x4000_0000);
    assert_eq!(read_u16_le(bytes, 52), 0);
    assert_eq!(bytes[54], 0);
    assert_eq!(bytes[55], 255);
}

#[test]
fn spcr_layout() {
    let factory = standard_factory().unwrap();
    let platform = platform();
    let info = table_info(*b"SPCR", 2, StdAcpiTableId::Spcr);
    let generator = factory.acpi_generator(info.generator_id).unwrap();
    let table = generator.build(&info, &platform).unwrap();
    let bytes = table.as_bytes();

    assert_eq!(bytes.len(), 80);
    assert_valid_sdt(bytes, b"SPCR");
    assert_eq!(bytes[36], 3); // interface type: ARM PL011
    // Base address GAS: system memory, 32-bit, dword access.
    assert_eq!(bytes[40], 0);
    assert_eq!(bytes[41], 32);
    assert_eq!(bytes[43], 3);
    assert_eq!(read_u64_le(bytes, 44), 0x1c09_0000);
    assert_eq!(bytes[52], 1 << 3); // interrupt type: GIC
    assert_eq!(read_u32_le(bytes, 54), 37); // GSIV
    assert_eq!(bytes[58], 7); // 115200 baud
    assert_eq!(bytes[59], 0); // parity
    assert_eq!(bytes[60], 1); // stop bits
    assert_eq!(bytes[62], 3); // terminal type: ANSI
    assert_eq!(read_u16_le(bytes, 64), 0xFFFF); // not a PCI device
    assert_eq!(read_u16_le(bytes, 66), 0xFFFF);
}

#[test]
fn dbg2_layout() {
    let factory = standard_factory().unwrap();
    let platform = platform();
    let info = table_info(*b"DBG2", 0, StdAcpiTableId::Dbg2);
    let generator = factory.acpi_generator(info.generator_id).unwrap();
    let table = generator.build(&info, &platform).unwrap();
    let bytes = table.as_bytes();

    assert_eq!(bytes.len(), 44 + 43);
    assert_valid_sdt(bytes, b"DBG2");
    assert_eq!(read_u32_le(bytes, 36), 44); // device info offset
    assert_eq!(read_u32_le(bytes, 40), 1); // device count

    let dev = 44;
    assert_eq!(bytes[dev], 0); // revision
    assert_eq!(read_u16_le(bytes, dev + 1), 43); // device info length
    assert_eq!(bytes[dev + 3], 1); // register count
    assert_eq!(read_u16_le(bytes, dev + 4), 5); // namespace string length
    assert_eq!(read_u16_le(bytes, dev + 6), 38); // namespace string offset
    assert_eq!(read_u16_le(bytes, dev + 12), 0x8000); // serial port
    assert_eq!(read_u16_le(bytes, dev + 14), 0x0003); // ARM PL011
    assert_eq!(read_u16_le(bytes, dev + 18), 22); // base address offset
    assert_eq!(read_u16_le(bytes, dev + 20), 34); // address size offset
    assert_eq!(read_u64_le(bytes, dev + 22 + 4), 0x1c0a_0000);
    assert_eq!(read_u32_le(bytes, dev + 34), 0x1000); // PL011 window size
    assert_eq!(&bytes[dev + 38..dev + 43], b"COM1\0");
}

#[test]
fn raw_generator_hands_the_blob_through() {
    let factory = standard_factory().unwrap();
    let platform = platform();

    let mut dsdt = vec![0u8; 36];
    dsdt[0..4].copy_from_slice(b"DSDT");
    dsdt[4..8].copy_from_slice(&36u32.to_le_bytes());
    dsdt[8] = 2;
    let sum: u8 = dsdt.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    dsdt[9] = 0u8.wrapping_sub(sum);
    let blob: Arc<[u8]> = dsdt.clone().into();

    let info = AcpiTableInfo {
        signature: *b"DSDT",
        revision: 2,
        generator_id: GeneratorId::std_acpi(StdAcpiTableId::DSDT),
        oem_table_id: 0,
        oem_revision: 0,
        table_data: Some(blob),
    };
    let generator = factory.acpi_generator(info.generator_id).unwrap();
    let table = generator.build(&info, &platform).unwrap();
    assert_eq!(table.as_bytes(), dsdt.as_slice());
    assert_eq!(table.signature(), Some(*b"DSDT"));
    assert_eq!(table.header_length(), Some(36));
    generator.free(&info, table).unwrap();
}

#[test]
fn oem_header_fields_flow_into_every_table() {
    let factory = standard_factory().unwrap();
    let platform = platform();
    let info = AcpiTableInfo {
        oem_table_id: u64::from_le_bytes(*b"DYNTTMPL"),
        oem_revision: 9,
        ..table_info(*b"MCFG", 1, StdAcpiTableId::Mcfg)
    };
    let generator = factory.acpi_generator(info.generator_id).unwrap();
    let table = generator.build(&info, &platform).unwrap();
    let bytes = table.as_bytes();

    assert_eq!(&bytes[10..16], b"DYNTAB"); // OEM ID from the CM
    assert_eq!(&bytes[16..24], b"DYNTTMPL");
    assert_eq!(read_u32_le(bytes, 24), 9);
}
