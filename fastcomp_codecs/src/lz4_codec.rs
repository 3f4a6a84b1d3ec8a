use fastcomp_core::{Codec, CodecError};

/// LZ4 block codec.
///
/// Raw LZ4 block format with no size prefix: the decompressed size is bounded
/// by the destination the caller passes in.
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress_bound(&self, src_len: usize) -> usize {
        lz4_flex::block::get_maximum_output_size(src_len)
    }

    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        lz4_flex::block::compress_into(src, dst).map_err(|e| CodecError::Compress {
            codec: "lz4",
            msg: e.to_string(),
        })
    }

    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        lz4_flex::block::decompress_into(src, dst).map_err(|e| CodecError::Decompress {
            codec: "lz4",
            msg: e.to_string(),
        })
    }
}
