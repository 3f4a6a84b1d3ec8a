use std::io::Read;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::arena::PageArena;
use crate::codec::Codec;
use crate::error::{BenchError, Phase};
use crate::plan::BlockPlan;
use crate::report::{compression_ratio, BenchReport, PhaseStats};
use crate::shuffle::shuffle_pages;

/// Parameters of one benchmark run.
///
/// The codec is chosen separately (by name, before any input is loaded) and
/// passed to [`run`].
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Block size in pages.
    pub block_pages: usize,
    /// Passes over all blocks in each phase.
    pub iterations: usize,
    /// Permute input pages before compressing.
    pub page_shuffle: bool,
    /// Fixed seed for the page permutation. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Compare the input digest before compression and after decompression.
    pub verify: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            block_pages: 1,
            iterations: 1,
            page_shuffle: false,
            seed: None,
            verify: false,
        }
    }
}

/// Input and output arenas plus per-block compressed lengths.
///
/// # Phase contract
/// [`compress_pass`] must run before [`decompress_pass`]: decompression reads
/// each block's slot using the length recorded by the last compression pass,
/// and writes its output over the input arena.
///
/// [`compress_pass`]: Workload::compress_pass
/// [`decompress_pass`]: Workload::decompress_pass
pub struct Workload {
    plan: BlockPlan,
    input: PageArena,
    output: PageArena,
    /// Bytes written by the last compression of each block.
    compressed_sizes: Vec<usize>,
}

impl Workload {
    /// Allocate both arenas for `plan` and read the usable prefix of `reader`
    /// into the input arena.
    pub fn load<R: Read>(plan: BlockPlan, reader: R) -> Result<Self, BenchError> {
        let mut input = PageArena::with_pages(plan.input_pages());
        input.fill_from(reader)?;
        let output = PageArena::with_pages(plan.output_pages());
        debug!(
            block_size = plan.block_size,
            nblock = plan.nblock,
            dropped = plan.file_size - plan.usable_size as u64,
            "input loaded"
        );
        Ok(Self {
            plan,
            input,
            output,
            compressed_sizes: vec![0; plan.nblock],
        })
    }

    pub fn input(&self) -> &[u8] {
        self.input.as_bytes()
    }

    pub fn compressed_sizes(&self) -> &[usize] {
        &self.compressed_sizes
    }

    /// Compressed bytes of block `idx` as recorded by the last pass.
    pub fn compressed_block(&self, idx: usize) -> &[u8] {
        let slot = self.plan.slot_range(idx);
        &self.output.as_bytes()[slot.start..slot.start + self.compressed_sizes[idx]]
    }

    /// Permute the input arena's pages.
    pub fn shuffle_pages<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        shuffle_pages(self.input.pages_mut(), rng);
    }

    /// xxh3-64 of the input arena.
    pub fn input_digest(&self) -> u64 {
        xxh3_64(self.input.as_bytes())
    }

    /// Compress every block `iterations` times, recording each block's length
    /// on every pass.
    ///
    /// Returns the phase timing and the total compressed bytes across all
    /// iterations.
    pub fn compress_pass(
        &mut self,
        codec: &mut dyn Codec,
        iterations: usize,
    ) -> Result<(PhaseStats, u64), BenchError> {
        let block_size = self.plan.block_size;
        let slot_size = self.plan.slot_size();
        let bound = codec.compress_bound(block_size);
        if bound > slot_size {
            warn!(
                codec = codec.name(),
                bound,
                slot_size,
                "codec worst case exceeds the per-block output slot; incompressible blocks will fail"
            );
        }

        let src_arena = self.input.as_bytes();
        let dst_arena = self.output.as_bytes_mut();
        let sizes = &mut self.compressed_sizes;
        let mut total_compressed = 0u64;

        debug!(codec = codec.name(), iterations, "compression phase start");
        let t0 = Instant::now();
        for _ in 0..iterations {
            let blocks = src_arena
                .chunks_exact(block_size)
                .zip(dst_arena.chunks_exact_mut(slot_size));
            for (bid, (src, dst)) in blocks.enumerate() {
                let written = codec.compress(dst, src).map_err(|source| BenchError::Codec {
                    phase: Phase::Compress,
                    block: bid,
                    source,
                })?;
                total_compressed += written as u64;
                sizes[bid] = written;
            }
        }
        let elapsed = t0.elapsed();
        debug!(elapsed_us = elapsed.as_micros() as u64, "compression phase end");

        let bytes = self.plan.usable_size as u64 * iterations as u64;
        Ok((PhaseStats::new(bytes, elapsed), total_compressed))
    }

    /// Decompress every block `iterations` times from its recorded compressed
    /// length back into the input arena, overwriting the original bytes.
    ///
    /// Output is not compared with the original here; see [`BenchConfig::verify`].
    pub fn decompress_pass(
        &mut self,
        codec: &mut dyn Codec,
        iterations: usize,
    ) -> Result<PhaseStats, BenchError> {
        let block_size = self.plan.block_size;
        let slot_size = self.plan.slot_size();
        let dst_arena = self.input.as_bytes_mut();
        let src_arena = self.output.as_bytes();
        let sizes = &self.compressed_sizes;

        debug!(codec = codec.name(), iterations, "decompression phase start");
        let t0 = Instant::now();
        for _ in 0..iterations {
            let blocks = dst_arena
                .chunks_exact_mut(block_size)
                .zip(src_arena.chunks_exact(slot_size));
            for (bid, (dst, slot)) in blocks.enumerate() {
                codec
                    .decompress(dst, &slot[..sizes[bid]])
                    .map_err(|source| BenchError::Codec {
                        phase: Phase::Decompress,
                        block: bid,
                        source,
                    })?;
            }
        }
        let elapsed = t0.elapsed();
        debug!(elapsed_us = elapsed.as_micros() as u64, "decompression phase end");

        let bytes = self.plan.usable_size as u64 * iterations as u64;
        Ok(PhaseStats::new(bytes, elapsed))
    }
}

/// Run a full benchmark: load, optionally shuffle, compress phase, then
/// decompress phase.
///
/// `file_size` is the total length `reader` can supply; only its whole-block
/// prefix is read.
pub fn run<R: Read>(
    config: &BenchConfig,
    codec: &mut dyn Codec,
    reader: R,
    file_size: u64,
) -> Result<BenchReport, BenchError> {
    if config.iterations == 0 {
        return Err(BenchError::ZeroIterations);
    }
    let plan = BlockPlan::new(file_size, config.block_pages)?;
    let mut workload = Workload::load(plan, reader)?;

    if config.page_shuffle {
        match config.seed {
            Some(seed) => workload.shuffle_pages(&mut StdRng::seed_from_u64(seed)),
            None => workload.shuffle_pages(&mut rand::thread_rng()),
        }
    }

    let expected = config.verify.then(|| workload.input_digest());

    let (compress, total_compressed) = workload.compress_pass(codec, config.iterations)?;
    let decompress = workload.decompress_pass(codec, config.iterations)?;

    if let Some(expected) = expected {
        let actual = workload.input_digest();
        if actual != expected {
            return Err(BenchError::VerifyMismatch { expected, actual });
        }
    }

    let ratio = compression_ratio(compress.bytes, total_compressed);
    Ok(BenchReport {
        codec: codec.name().to_string(),
        block_pages: plan.block_pages,
        iterations: config.iterations,
        page_shuffle: config.page_shuffle,
        file_size: plan.usable_size,
        nblock: plan.nblock,
        compress,
        total_compressed,
        ratio,
        inverse_ratio: if ratio > 0.0 { 1.0 / ratio } else { 0.0 },
        decompress,
        verified: config.verify,
    })
}
