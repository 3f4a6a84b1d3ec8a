use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use fastcomp_core::{Codec, CodecError};

/// zlib's `compressBound`: worst-case zlib stream size for `src_len` bytes.
pub fn deflate_bound(src_len: usize) -> usize {
    src_len + (src_len >> 12) + (src_len >> 14) + (src_len >> 25) + 13
}

/// zlib-wrapped deflate codec at the default level.
///
/// Uses flate2's low-level stream objects so output goes straight into the
/// caller's slot. Capacity is whatever the caller passes; if the stream does
/// not fit, the call fails instead of growing anything.
pub struct DeflateCodec {
    enc: Compress,
    dec: Decompress,
}

impl DeflateCodec {
    pub fn new() -> Self {
        Self {
            enc: Compress::new(Compression::default(), true),
            dec: Decompress::new(true),
        }
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for DeflateCodec {
    fn name(&self) -> &'static str {
        "842"
    }

    fn compress_bound(&self, src_len: usize) -> usize {
        deflate_bound(src_len)
    }

    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        self.enc.reset();
        let status = self
            .enc
            .compress(src, dst, FlushCompress::Finish)
            .map_err(|e| CodecError::Compress {
                codec: "842",
                msg: e.to_string(),
            })?;
        match status {
            Status::StreamEnd => Ok(self.enc.total_out() as usize),
            Status::Ok | Status::BufError => Err(CodecError::DstTooSmall {
                codec: "842",
                needed: deflate_bound(src.len()),
                capacity: dst.len(),
            }),
        }
    }

    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        self.dec.reset(true);
        let status = self
            .dec
            .decompress(src, dst, FlushDecompress::Finish)
            .map_err(|e| CodecError::Decompress {
                codec: "842",
                msg: e.to_string(),
            })?;
        match status {
            Status::StreamEnd => Ok(self.dec.total_out() as usize),
            Status::Ok | Status::BufError => Err(CodecError::Decompress {
                codec: "842",
                msg: "truncated stream or destination too small".into(),
            }),
        }
    }
}
