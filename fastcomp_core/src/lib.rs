pub mod arena;
pub mod bench;
pub mod codec;
pub mod error;
pub mod plan;
pub mod report;
pub mod shuffle;

pub use arena::{Page, PageArena, MIB, PAGE_SIZE};
pub use bench::{run, BenchConfig, Workload};
pub use codec::Codec;
pub use error::{BenchError, CodecError, Phase};
pub use plan::{BlockPlan, OUTPUT_EXPANSION};
pub use report::{compression_ratio, throughput_mib_s, BenchReport, PhaseStats};
