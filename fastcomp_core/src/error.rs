//! Error types for the benchmark core.
//!
//! Two layers:
//!
//! - [`CodecError`] is what a [`Codec`](crate::Codec) returns. It covers
//!   configuration faults found at construction (unknown token, bad level) and
//!   faults reported by the underlying coder at compress/decompress time.
//! - [`BenchError`] is what the driver returns. Codec failures are wrapped with
//!   the phase and block index they happened in.
//!
//! Nothing in the core retries. The binary decides that every error ends the
//! run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unknown codec '{name}'. Valid options: {valid}")]
    UnknownCodec { name: String, valid: String },

    #[error("invalid {codec} compression level {level} (accepted range {min}..={max})")]
    InvalidLevel {
        codec: &'static str,
        level: i32,
        min: i32,
        max: i32,
    },

    #[error("{codec} codec init failed: {msg}")]
    Init { codec: &'static str, msg: String },

    #[error("{codec} compression failed: {msg}")]
    Compress { codec: &'static str, msg: String },

    #[error("{codec} decompression failed: {msg}")]
    Decompress { codec: &'static str, msg: String },

    #[error("{codec} output needs {needed} bytes but destination holds {capacity}")]
    DstTooSmall {
        codec: &'static str,
        needed: usize,
        capacity: usize,
    },
}

impl CodecError {
    /// True for errors raised while selecting or constructing a codec, before
    /// any data went through it.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            CodecError::UnknownCodec { .. } | CodecError::InvalidLevel { .. } | CodecError::Init { .. }
        )
    }
}

/// Which measured phase an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Compress,
    Decompress,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Compress => f.write_str("compression"),
            Phase::Decompress => f.write_str("decompression"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("block size must be at least one page")]
    ZeroBlockPages,

    #[error("iteration count must be at least 1")]
    ZeroIterations,

    #[error("input of {0} bytes does not fit in memory on this platform")]
    InputTooLarge(u64),

    #[error("I/O error while loading input: {0}")]
    Io(#[from] std::io::Error),

    #[error("{phase} of block {block} failed: {source}")]
    Codec {
        phase: Phase,
        block: usize,
        #[source]
        source: CodecError,
    },

    #[error("round-trip mismatch: input digest {expected:016x}, after decompression {actual:016x}")]
    VerifyMismatch { expected: u64, actual: u64 },
}
