//! GTDT (Generic Timer Description Table) generator.
//!
//! The fixed part describes the per-CPU architected timers; platform timer
//! structures follow for memory-mapped GT blocks and SBSA watchdogs.

use dyntab_cm::arm::{GenericTimerInfo, GenericWatchdogInfo, GtBlockInfo};
use dyntab_cm::{optional_list, required_one, ArmObjectId, CmObjectId, ConfigurationManager};
use dyntab_core::{
    make_revision, AcpiTableGenerator, AcpiTableInfo, BuiltAcpiTable, GeneratorDescriptor,
    GeneratorId, Result, StdAcpiTableId, TableGenError,
};
use log::{debug, error};

use crate::sdt::{build_sdt_header, finalize_sdt, validate_table_info};

const GTDT_FIXED_LEN: usize = 96;

const GT_BLOCK_TYPE: u8 = 0;
const GT_BLOCK_HEADER_LEN: usize = 20;
const GT_BLOCK_FRAME_LEN: usize = 40;
/// The GT block frame number field is 3 bits wide.
const GT_BLOCK_MAX_FRAMES: usize = 8;

const WATCHDOG_TYPE: u8 = 1;
const WATCHDOG_LEN: usize = 28;

#[derive(Debug)]
pub struct GtdtGenerator {
    descriptor: GeneratorDescriptor,
}

impl GtdtGenerator {
    pub fn new() -> Self {
        Self {
            descriptor: GeneratorDescriptor {
                id: GeneratorId::std_acpi(StdAcpiTableId::Gtdt),
                description: "ACPI.STD.GTDT.GENERATOR",
                signature: *b"GTDT",
                revision: 2,
                creator_id: *b"ARMH",
                creator_revision: make_revision(1, 0),
            },
        }
    }
}

impl Default for GtdtGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_gt_block(block: &GtBlockInfo) -> Result<()> {
    if block.timer_frames.len() > GT_BLOCK_MAX_FRAMES {
        error!(
            "GTDT: GT block has {} timer frames, at most {GT_BLOCK_MAX_FRAMES} fit",
            block.timer_frames.len()
        );
        return Err(TableGenError::InvalidParameter(
            "GT block carries more than 8 timer frames",
        ));
    }
    let mut seen = [false; GT_BLOCK_MAX_FRAMES];
    for frame in &block.timer_frames {
        let number = frame.frame_number as usize;
        if number >= GT_BLOCK_MAX_FRAMES {
            return Err(TableGenError::InvalidParameter(
                "GT block frame number must be 0-7",
            ));
        }
        if seen[number] {
            error!("GTDT: duplicate GT block frame number {number}");
            return Err(TableGenError::InvalidParameter(
                "GT block frame numbers must be unique",
            ));
        }
        seen[number] = true;
    }
    Ok(())
}

impl AcpiTableGenerator for GtdtGenerator {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &self.descriptor
    }

    fn build(
        &self,
        table_info: &AcpiTableInfo,
        cm: &dyn ConfigurationManager,
    ) -> Result<BuiltAcpiTable> {
        validate_table_info(&self.descriptor, table_info)?;

        let timer: &GenericTimerInfo =
            required_one(cm, CmObjectId::arm(ArmObjectId::GenericTimerInfo))?;
        let gt_blocks: &[GtBlockInfo] =
            optional_list(cm, CmObjectId::arm(ArmObjectId::PlatformGtBlockInfo))?;
        let watchdogs: &[GenericWatchdogInfo] = optional_list(
            cm,
            CmObjectId::arm(ArmObjectId::PlatformGenericWatchdogInfo),
        )?;

        // All input is validated before the first byte is emitted.
        for block in gt_blocks {
            validate_gt_block(block)?;
        }

        let platform_timer_count = gt_blocks.len() + watchdogs.len();
        let platform_timer_offset = if platform_timer_count != 0 {
            GTDT_FIXED_LEN
        } else {
            0
        };
        let total_len = GTDT_FIXED_LEN
            + gt_blocks
                .iter()
                .map(|b| GT_BLOCK_HEADER_LEN + b.timer_frames.len() * GT_BLOCK_FRAME_LEN)
                .sum::<usize>()
            + watchdogs.len() * WATCHDOG_LEN;

        debug!(
            "GTDT: {total_len} bytes, {} GT blocks, {} watchdogs",
            gt_blocks.len(),
            watchdogs.len()
        );

        let mut out = Vec::with_capacity(total_len);
        out.extend_from_slice(&build_sdt_header(
            &self.descriptor,
            table_info,
            cm.info(),
            total_len as u32,
        ));
        out.extend_from_slice(&timer.counter_control_base_address.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // reserved
        out.extend_from_slice(&timer.secure_pl1_timer_gsiv.to_le_bytes());
        out.extend_from_slice(&timer.secure_pl1_timer_flags.bits().to_le_bytes());
        out.extend_from_slice(&timer.non_secure_pl1_timer_gsiv.to_le_bytes());
        out.extend_from_slice(&timer.non_secure_pl1_timer_flags.bits().to_le_bytes());
        out.extend_from_slice(&timer.virtual_timer_gsiv.to_le_bytes());
        out.extend_from_slice(&timer.virtual_timer_flags.bits().to_le_bytes());
        out.extend_from_slice(&timer.non_secure_pl2_timer_gsiv.to_le_bytes());
        out.extend_from_slice(&timer.non_secure_pl2_timer_flags.bits().to_le_bytes());
        out.extend_from_slice(&timer.counter_read_base_address.to_le_bytes());
        out.extend_from_slice(&(platform_timer_count as u32).to_le_bytes());
        out.extend_from_slice(&(platform_timer_offset as u32).to_le_bytes());

        for block in gt_blocks {
            let block_len = GT_BLOCK_HEADER_LEN + block.timer_frames.len() * GT_BLOCK_FRAME_LEN;
            out.push(GT_BLOCK_TYPE);
            out.extend_from_slice(&(block_len as u16).to_le_bytes());
            out.push(0); // reserved
            out.extend_from_slice(&block.physical_base_address.to_le_bytes());
            out.extend_from_slice(&(block.timer_frames.len() as u32).to_le_bytes());
            out.extend_from_slice(&(GT_BLOCK_HEADER_LEN as u32).to_le_bytes());
            for frame in &block.timer_frames {
                out.push(frame.frame_number);
                out.extend_from_slice(&[0u8; 3]); // reserved
                out.extend_from_slice(&frame.cnt_base_address.to_le_bytes());
                out.extend_from_slice(&frame.cnt_el0_base_address.to_le_bytes());
                out.extend_from_slice(&frame.physical_timer_gsiv.to_le_bytes());
                out.extend_from_slice(&frame.physical_timer_flags.bits().to_le_bytes());
                out.extend_from_slice(&frame.virtual_timer_gsiv.to_le_bytes());
                out.extend_from_slice(&frame.virtual_timer_flags.bits().to_le_bytes());
                out.extend_from_slice(&frame.common_flags.bits().to_le_bytes());
            }
        }

        for watchdog in watchdogs {
            out.push(WATCHDOG_TYPE);
            out.extend_from_slice(&(WATCHDOG_LEN as u16).to_le_bytes());
            out.push(0); // reserved
            out.extend_from_slice(&watchdog.refresh_frame_address.to_le_bytes());
            out.extend_from_slice(&watchdog.control_frame_address.to_le_bytes());
            out.extend_from_slice(&watchdog.timer_gsiv.to_le_bytes());
            out.extend_from_slice(&watchdog.flags.bits().to_le_bytes());
        }

        debug_assert_eq!(out.len(), total_len);
        Ok(BuiltAcpiTable::generated(finalize_sdt(out)))
    }
}
