use lzokay::compress::{compress_no_alloc, compress_worst_size, new_dict, Dict};
use lzokay::decompress::decompress;

use fastcomp_core::{Codec, CodecError};

/// LZO1X codec.
///
/// The compressor needs a fixed-size working-memory dictionary. Each codec
/// instance owns one and reuses it for every block; two instances never share
/// it.
pub struct LzoCodec {
    dict: Dict<'static>,
}

impl LzoCodec {
    pub fn new() -> Self {
        Self { dict: new_dict() }
    }
}

impl Default for LzoCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for LzoCodec {
    fn name(&self) -> &'static str {
        "lzo"
    }

    fn compress_bound(&self, src_len: usize) -> usize {
        compress_worst_size(src_len)
    }

    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        compress_no_alloc(src, dst, &mut self.dict).map_err(|e| CodecError::Compress {
            codec: "lzo",
            msg: format!("{e:?}"),
        })
    }

    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        decompress(src, dst).map_err(|e| CodecError::Decompress {
            codec: "lzo",
            msg: format!("{e:?}"),
        })
    }
}
