use fastcomp_core::{Codec, CodecError};

/// Level used when none is given: the fastest standard level.
pub const ZSTD_FAST_LEVEL: i32 = 1;

/// Zstandard one-shot codec.
///
/// Each block is compressed as its own zstd frame at the configured level.
/// The level is validated against the linked libzstd's accepted range when
/// the codec is built, never at first use.
pub struct ZstdCodec {
    level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self {
            level: ZSTD_FAST_LEVEL,
        }
    }
}

impl ZstdCodec {
    pub fn new(level: i32) -> Result<Self, CodecError> {
        let range = zstd::compression_level_range();
        if !range.contains(&level) {
            return Err(CodecError::InvalidLevel {
                codec: "zstd",
                level,
                min: *range.start(),
                max: *range.end(),
            });
        }
        Ok(Self { level })
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Codec for ZstdCodec {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress_bound(&self, src_len: usize) -> usize {
        zstd::zstd_safe::compress_bound(src_len)
    }

    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        zstd::bulk::compress_to_buffer(src, dst, self.level).map_err(|e| CodecError::Compress {
            codec: "zstd",
            msg: e.to_string(),
        })
    }

    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        zstd::bulk::decompress_to_buffer(src, dst).map_err(|e| CodecError::Decompress {
            codec: "zstd",
            msg: e.to_string(),
        })
    }
}
