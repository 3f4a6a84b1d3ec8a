use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::arena::MIB;

/// Throughput in MiB/s for `bytes` processed in `elapsed`.
///
/// Measured at microsecond resolution; a sub-microsecond phase counts as one
/// microsecond. Zero bytes is zero throughput.
pub fn throughput_mib_s(bytes: u64, elapsed: Duration) -> f64 {
    if bytes == 0 {
        return 0.0;
    }
    let us = elapsed.as_micros().max(1) as f64;
    bytes as f64 / MIB / us * 1_000_000.0
}

/// Original / compressed. Zero when nothing was compressed.
pub fn compression_ratio(original: u64, compressed: u64) -> f64 {
    if compressed == 0 {
        return 0.0;
    }
    original as f64 / compressed as f64
}

/// Timing of one measured phase.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PhaseStats {
    /// Uncompressed bytes processed across all iterations.
    pub bytes: u64,
    pub elapsed_us: u64,
    pub throughput_mib_s: f64,
}

impl PhaseStats {
    pub fn new(bytes: u64, elapsed: Duration) -> Self {
        Self {
            bytes,
            elapsed_us: elapsed.as_micros() as u64,
            throughput_mib_s: throughput_mib_s(bytes, elapsed),
        }
    }
}

/// Result of one benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub codec: String,
    pub block_pages: usize,
    pub iterations: usize,
    pub page_shuffle: bool,
    /// Input size after truncation to whole blocks.
    pub file_size: usize,
    pub nblock: usize,
    pub compress: PhaseStats,
    pub total_compressed: u64,
    pub ratio: f64,
    pub inverse_ratio: f64,
    pub decompress: PhaseStats,
    /// Whether the input digest was checked after decompression.
    pub verified: bool,
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[INFO]: block size {} pages, number of iterations {}",
            self.block_pages, self.iterations
        )?;
        writeln!(
            f,
            "[INFO]: file size {}, number of blocks {}",
            self.file_size, self.nblock
        )?;
        writeln!(
            f,
            "[INFO]: compression throughput {:.3} MiB/Second",
            self.compress.throughput_mib_s
        )?;
        writeln!(
            f,
            "[INFO]: compression ratio (original size / compressed size) {:.4}, compressed size / original size {:.4}",
            self.ratio, self.inverse_ratio
        )?;
        write!(
            f,
            "[INFO]: decompression throughput {:.3} MiB/Second",
            self.decompress.throughput_mib_s
        )
    }
}
