use lz4::block::{compress_bound, compress_to_buffer, decompress_to_buffer, CompressionMode};

use fastcomp_core::{Codec, CodecError};

/// High-effort liblz4 HC level used by [`Lz4HcCodec`].
pub const LZ4HC_LEVEL: i32 = 9;

/// LZ4 high-compression codec.
///
/// Produces the same block format as [`Lz4Codec`](crate::Lz4Codec), so either
/// decoder can read it. The level is fixed; liblz4 clamps anything it
/// doesn't accept.
pub struct Lz4HcCodec {
    level: i32,
}

impl Default for Lz4HcCodec {
    fn default() -> Self {
        Self {
            level: LZ4HC_LEVEL,
        }
    }
}

impl Codec for Lz4HcCodec {
    fn name(&self) -> &'static str {
        "lz4hc"
    }

    fn compress_bound(&self, src_len: usize) -> usize {
        // liblz4 rejects inputs past i32::MAX; no slot can hold their output
        compress_bound(src_len).unwrap_or(usize::MAX)
    }

    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        let mode = Some(CompressionMode::HIGHCOMPRESSION(self.level));
        compress_to_buffer(src, mode, false, dst).map_err(|e| CodecError::Compress {
            codec: "lz4hc",
            msg: e.to_string(),
        })
    }

    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        let capacity = i32::try_from(dst.len()).unwrap_or(i32::MAX);
        decompress_to_buffer(src, Some(capacity), dst).map_err(|e| CodecError::Decompress {
            codec: "lz4hc",
            msg: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_comes_from_liblz4() {
        let codec = Lz4HcCodec::default();
        assert_eq!(codec.compress_bound(0), 16);
        assert_eq!(codec.compress_bound(4096), 4096 + 4096 / 255 + 16);
        assert_eq!(codec.compress_bound(usize::MAX), usize::MAX);
    }
}
