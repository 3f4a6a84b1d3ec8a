use std::ops::Range;

use crate::arena::PAGE_SIZE;
use crate::error::BenchError;

/// Output bytes reserved per input byte of a block.
///
/// This is a benchmark policy, not a codec property: a codec whose worst case
/// exceeds it fails at compress time with a capacity error instead of
/// overflowing its slot.
pub const OUTPUT_EXPANSION: usize = 2;

/// Block partitioning and buffer sizing for one run.
///
/// ```text
/// input arena  : [block 0][block 1] ... [block n-1]            n × block_size
/// output arena : [slot 0      ][slot 1      ] ... [slot n-1  ]  n × 2·block_size
/// ```
///
/// Trailing input bytes that do not fill a whole block are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlan {
    pub block_pages: usize,
    pub block_size: usize,
    /// Size of the input as reported by the caller, before truncation.
    pub file_size: u64,
    /// `file_size` rounded down to a multiple of `block_size`.
    pub usable_size: usize,
    pub nblock: usize,
}

impl BlockPlan {
    pub fn new(file_size: u64, block_pages: usize) -> Result<Self, BenchError> {
        if block_pages == 0 {
            return Err(BenchError::ZeroBlockPages);
        }
        let block_size = block_pages
            .checked_mul(PAGE_SIZE)
            .ok_or(BenchError::InputTooLarge(file_size))?;
        let nblock = usize::try_from(file_size / block_size as u64)
            .map_err(|_| BenchError::InputTooLarge(file_size))?;
        let usable_size = nblock
            .checked_mul(block_size)
            .ok_or(BenchError::InputTooLarge(file_size))?;
        Ok(Self {
            block_pages,
            block_size,
            file_size,
            usable_size,
            nblock,
        })
    }

    /// Capacity of one block's output slot.
    #[inline]
    pub fn slot_size(&self) -> usize {
        self.block_size * OUTPUT_EXPANSION
    }

    pub fn input_pages(&self) -> usize {
        self.usable_size / PAGE_SIZE
    }

    pub fn output_pages(&self) -> usize {
        self.input_pages() * OUTPUT_EXPANSION
    }

    /// Byte range of block `idx` in the input arena.
    pub fn block_range(&self, idx: usize) -> Range<usize> {
        let start = idx * self.block_size;
        start..start + self.block_size
    }

    /// Byte range of block `idx`'s slot in the output arena.
    pub fn slot_range(&self, idx: usize) -> Range<usize> {
        let start = idx * self.slot_size();
        start..start + self.slot_size()
    }
}
