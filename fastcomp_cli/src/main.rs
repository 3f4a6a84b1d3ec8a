use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fastcomp_codecs::{codec_by_name, CODEC_NAMES, DEFAULT_CODEC};
use fastcomp_core::{BenchConfig, BenchReport};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "fastcomp",
    about = "Measure block compression and decompression throughput of lossless codecs",
    version
)]
struct Cli {
    /// Log plan and phase boundaries to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark one codec on one file
    Run {
        /// Input file; only its whole-block prefix is loaded
        file: PathBuf,
        /// Block size in 4 KiB pages
        #[arg(short, long, default_value_t = 1)]
        block_pages: usize,
        /// Passes over all blocks in each phase
        #[arg(short, long, default_value_t = 1)]
        iterations: usize,
        /// Codec token (see `fastcomp codecs`)
        #[arg(short, long, default_value = DEFAULT_CODEC)]
        codec: String,
        /// Compression level (zstd only)
        #[arg(long)]
        level: Option<i32>,
        /// Randomly permute input pages before compressing
        #[arg(long)]
        shuffle: bool,
        /// Fixed seed for --shuffle
        #[arg(long)]
        seed: Option<u64>,
        /// Check that decompression restores the input (untimed)
        #[arg(long)]
        verify: bool,
        /// Print the report as one JSON object
        #[arg(long)]
        json: bool,
    },
    /// Run every combination of files, codecs, block sizes, iteration counts
    /// and shuffle modes
    Sweep {
        /// Input files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, value_delimiter = ',', default_values_t = SWEEP_CODECS.iter().map(|c| c.to_string()))]
        codecs: Vec<String>,
        #[arg(long, value_delimiter = ',', default_values_t = [1usize, 4])]
        block_pages: Vec<usize>,
        #[arg(long, value_delimiter = ',', default_values_t = [1usize, 5])]
        iterations: Vec<usize>,
        /// 0 = file order, 1 = shuffled pages
        #[arg(long, value_delimiter = ',', default_values_t = [0u8, 1])]
        shuffle_modes: Vec<u8>,
        /// Fixed seed for shuffled runs
        #[arg(long)]
        seed: Option<u64>,
        /// Print one JSON object per run instead of a table
        #[arg(long)]
        json: bool,
        /// Also write every row, failed runs included, to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List recognized codec tokens
    Codecs,
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the codec first so a bad token or level fails before the file is
/// touched, then load and benchmark.
fn bench_file(
    path: &Path,
    codec_name: &str,
    level: Option<i32>,
    config: &BenchConfig,
) -> anyhow::Result<BenchReport> {
    let mut codec = codec_by_name(codec_name, level)?;

    let file = File::open(path).with_context(|| format!("opening input file {:?}", path))?;
    let file_size = file
        .metadata()
        .with_context(|| format!("reading metadata of {:?}", path))?
        .len();

    let report = fastcomp_core::run(config, codec.as_mut(), BufReader::new(file), file_size)
        .with_context(|| format!("benchmarking {} on {:?}", codec_name, path))?;
    if report.nblock == 0 {
        warn!(
            file = %path.display(),
            file_size,
            block_pages = config.block_pages,
            "input is smaller than one block; nothing was measured"
        );
    }
    Ok(report)
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_single(
    file: PathBuf,
    codec: &str,
    level: Option<i32>,
    config: BenchConfig,
    json: bool,
) -> anyhow::Result<()> {
    let report = bench_file(&file, codec, level, &config)?;
    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", report);
        if report.verified {
            info!("round-trip verified");
        }
    }
    Ok(())
}

/// Codecs the sweep covers when `--codecs` is not given.
const SWEEP_CODECS: &[&str] = &["lz4", "lz4hc", "lzo", "lzo-rle", "zstd", "842"];

struct SweepMatrix {
    files: Vec<PathBuf>,
    codecs: Vec<String>,
    block_pages: Vec<usize>,
    iterations: Vec<usize>,
    shuffle_modes: Vec<u8>,
    seed: Option<u64>,
}

impl SweepMatrix {
    fn len(&self) -> usize {
        self.files.len()
            * self.codecs.len()
            * self.block_pages.len()
            * self.iterations.len()
            * self.shuffle_modes.len()
    }
}

/// One combination of the sweep: its measurements, or the error that
/// stopped it.
#[derive(Debug, Serialize)]
struct SweepRow {
    file: String,
    codec: String,
    block_pages: usize,
    iterations: usize,
    page_shuffle: bool,
    file_size: Option<usize>,
    nblock: Option<usize>,
    compress_mib_s: Option<f64>,
    ratio: Option<f64>,
    decompress_mib_s: Option<f64>,
    error: Option<String>,
}

impl SweepRow {
    fn print(&self) {
        let cell = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<12} {:>5} {:>5} {:>7} {:>11} {:>7} {:>14} {:>9} {:>14}{}",
            self.file,
            self.codec,
            self.block_pages,
            self.iterations,
            self.page_shuffle,
            cell(self.file_size.map(|n| human_bytes(n as u64))),
            cell(self.nblock.map(|n| n.to_string())),
            cell(self.compress_mib_s.map(|t| format!("{:.3}", t))),
            cell(self.ratio.map(|r| format!("{:.4}", r))),
            cell(self.decompress_mib_s.map(|t| format!("{:.3}", t))),
            self.error
                .as_ref()
                .map(|e| format!("  FAILED: {}", e))
                .unwrap_or_default()
        );
    }
}

/// Run every combination, handing each row to `emit`. A failed combination
/// becomes a row carrying its error and the sweep moves on.
///
/// Returns the number of failed combinations.
fn sweep(
    matrix: &SweepMatrix,
    mut emit: impl FnMut(&SweepRow) -> anyhow::Result<()>,
) -> anyhow::Result<usize> {
    let mut failed = 0;
    for file in &matrix.files {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        for codec in &matrix.codecs {
            for &block_pages in &matrix.block_pages {
                for &iterations in &matrix.iterations {
                    for &mode in &matrix.shuffle_modes {
                        let config = BenchConfig {
                            block_pages,
                            iterations,
                            page_shuffle: mode != 0,
                            seed: matrix.seed,
                            verify: false,
                        };
                        let mut row = SweepRow {
                            file: file_name.clone(),
                            codec: codec.clone(),
                            block_pages,
                            iterations,
                            page_shuffle: config.page_shuffle,
                            file_size: None,
                            nblock: None,
                            compress_mib_s: None,
                            ratio: None,
                            decompress_mib_s: None,
                            error: None,
                        };
                        match bench_file(file, codec, None, &config) {
                            Ok(report) => {
                                row.file_size = Some(report.file_size);
                                row.nblock = Some(report.nblock);
                                row.compress_mib_s = Some(report.compress.throughput_mib_s);
                                row.ratio = Some(report.ratio);
                                row.decompress_mib_s = Some(report.decompress.throughput_mib_s);
                            }
                            Err(e) => {
                                let msg = format!("{e:#}");
                                warn!(
                                    file = %file.display(),
                                    codec = codec.as_str(),
                                    block_pages,
                                    iterations,
                                    page_shuffle = config.page_shuffle,
                                    error = %msg,
                                    "sweep run failed"
                                );
                                row.error = Some(msg);
                                failed += 1;
                            }
                        }
                        emit(&row)?;
                    }
                }
            }
        }
    }
    Ok(failed)
}

fn run_sweep(matrix: SweepMatrix, json: bool, csv_path: Option<PathBuf>) -> anyhow::Result<()> {
    // catch a bad token before any file is loaded
    for name in &matrix.codecs {
        codec_by_name(name, None)?;
    }

    let mut csv_out = csv_path
        .as_ref()
        .map(|p| csv::Writer::from_path(p).with_context(|| format!("creating CSV file {:?}", p)))
        .transpose()?;

    if !json {
        println!(
            "{:<24} {:<12} {:>5} {:>5} {:>7} {:>11} {:>7} {:>14} {:>9} {:>14}",
            "file", "codec", "pages", "iters", "shuffle", "size", "blocks", "comp MiB/s", "ratio", "decomp MiB/s"
        );
        println!("{}", "-".repeat(116));
    }

    let failed = sweep(&matrix, |row| {
        if json {
            println!("{}", serde_json::to_string(row)?);
        } else {
            row.print();
        }
        if let Some(w) = csv_out.as_mut() {
            w.serialize(row)?;
        }
        Ok(())
    })?;

    if let Some(mut w) = csv_out {
        w.flush()?;
    }
    if failed > 0 {
        anyhow::bail!("{} of {} sweep runs failed", failed, matrix.len());
    }
    Ok(())
}

fn run_codecs() -> anyhow::Result<()> {
    for &name in CODEC_NAMES {
        let codec = codec_by_name(name, None)?;
        let note = if name == DEFAULT_CODEC {
            " (default)"
        } else if codec.name() != name {
            " (alias)"
        } else {
            ""
        };
        println!("  {:<12} bound(4 KiB) = {:>5}{}", name, codec.compress_bound(4096), note);
    }
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            file,
            block_pages,
            iterations,
            codec,
            level,
            shuffle,
            seed,
            verify,
            json,
        } => {
            let config = BenchConfig {
                block_pages,
                iterations,
                page_shuffle: shuffle,
                seed,
                verify,
            };
            run_single(file, &codec, level, config, json)
        }
        Commands::Sweep {
            files,
            codecs,
            block_pages,
            iterations,
            shuffle_modes,
            seed,
            json,
            csv,
        } => run_sweep(
            SweepMatrix {
                files,
                codecs,
                block_pages,
                iterations,
                shuffle_modes,
                seed,
            },
            json,
            csv,
        ),
        Commands::Codecs => run_codecs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const PAGE: usize = 4096;

    /// Generate `len` deterministic bytes using a simple LCG.
    fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut rng = seed;
        (0..len)
            .map(|_| {
                rng = rng
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (rng >> 56) as u8
            })
            .collect()
    }

    fn compressible_bytes(len: usize) -> Vec<u8> {
        let pattern = b"the quick brown fox jumps over the lazy dog. ";
        (0..len).map(|i| pattern[i % pattern.len()]).collect()
    }

    fn one_pass(files: Vec<PathBuf>, codecs: &[&str]) -> SweepMatrix {
        SweepMatrix {
            files,
            codecs: codecs.iter().map(|c| c.to_string()).collect(),
            block_pages: vec![1],
            iterations: vec![1],
            shuffle_modes: vec![0],
            seed: None,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sweep_lists_split_on_commas() {
        let cli = Cli::try_parse_from([
            "fastcomp", "sweep", "a.bin", "b.bin", "--codecs", "lz4,lzo-rle", "--block-pages", "1,2,8",
        ])
        .unwrap();
        match cli.command {
            Commands::Sweep {
                files,
                codecs,
                block_pages,
                iterations,
                shuffle_modes,
                ..
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(codecs, ["lz4", "lzo-rle"]);
                assert_eq!(block_pages, [1, 2, 8]);
                assert_eq!(iterations, [1, 5]);
                assert_eq!(shuffle_modes, [0, 1]);
            }
            _ => panic!("expected sweep"),
        }
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["fastcomp", "run", "input.bin"]).unwrap();
        match cli.command {
            Commands::Run {
                block_pages,
                iterations,
                codec,
                level,
                shuffle,
                verify,
                ..
            } => {
                assert_eq!(block_pages, 1);
                assert_eq!(iterations, 1);
                assert_eq!(codec, DEFAULT_CODEC);
                assert_eq!(level, None);
                assert!(!shuffle && !verify);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn unknown_codec_fails_before_reading_the_file() {
        let err = bench_file(
            Path::new("/nonexistent/input.bin"),
            "unknown-xyz",
            None,
            &BenchConfig::default(),
        )
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("unknown codec 'unknown-xyz'"), "got: {msg}");
        assert!(!msg.contains("opening input file"));
    }

    #[test]
    fn sweep_defaults_to_the_full_codec_list() {
        let cli = Cli::try_parse_from(["fastcomp", "sweep", "a.bin"]).unwrap();
        match cli.command {
            Commands::Sweep { codecs, csv, .. } => {
                assert_eq!(codecs, SWEEP_CODECS);
                assert!(csv.is_none());
            }
            _ => panic!("expected sweep"),
        }
    }

    #[test]
    fn sweep_keeps_going_after_a_failed_run() {
        let dir = tempfile::tempdir().unwrap();
        let random = dir.path().join("random.bin");
        let text = dir.path().join("text.bin");
        let missing = dir.path().join("missing.bin");
        std::fs::write(&random, pseudo_random_bytes(8 * PAGE, 0xBAD5EED)).unwrap();
        std::fs::write(&text, compressible_bytes(8 * PAGE)).unwrap();

        let matrix = one_pass(
            vec![random, missing, text],
            &["lz4", "lzo-rle", "zstd"],
        );
        let mut rows = Vec::new();
        let failed = sweep(&matrix, |row| {
            rows.push((row.file.clone(), row.codec.clone(), row.nblock, row.error.clone()));
            Ok(())
        })
        .unwrap();

        assert_eq!(rows.len(), matrix.len());
        assert_eq!(failed, rows.iter().filter(|r| r.3.is_some()).count());
        assert!(failed >= 3);

        for (file, codec, nblock, error) in &rows {
            match (file.as_str(), codec.as_str()) {
                ("missing.bin", _) => {
                    assert!(error.as_deref().unwrap().contains("opening input file"));
                }
                // incompressible blocks may overflow the cascade's slot
                ("random.bin", "lzo-rle") => {
                    if let Some(e) = error {
                        assert!(e.contains("compression of block"), "got: {e}");
                    }
                }
                _ => {
                    assert!(error.is_none(), "{file}/{codec}: {error:?}");
                    assert_eq!(*nblock, Some(8));
                }
            }
        }
    }

    #[test]
    fn sweep_writes_every_row_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("text.bin");
        std::fs::write(&text, compressible_bytes(4 * PAGE)).unwrap();
        let out = dir.path().join("results.csv");

        let matrix = one_pass(vec![text, dir.path().join("missing.bin")], &["lz4"]);
        let err = run_sweep(matrix, true, Some(out.clone())).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 sweep runs failed");

        let csv = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("file,codec,block_pages,iterations,page_shuffle,"));
        assert!(lines[0].ends_with(",error"));
        assert!(lines[1].starts_with("text.bin,lz4,1,1,false,16384,4,"));
        assert!(lines[1].ends_with(','), "successful row has an empty error field");
        assert!(lines[2].starts_with("missing.bin,lz4,1,1,false,,,"));
        assert!(lines[2].contains("opening input file"));
    }

    #[test]
    fn human_bytes_units() {
        assert_eq!(human_bytes(512), "512 B");
        assert_eq!(human_bytes(4096), "4.00 KiB");
        assert_eq!(human_bytes(3 << 20), "3.00 MiB");
    }
}
