use zstd::bulk::Compressor;
use zstd::stream::raw::{Decoder, InBuffer, Operation, OutBuffer};

use fastcomp_core::{Codec, CodecError};

use crate::zstd_codec::ZSTD_FAST_LEVEL;

/// Zstandard frame codec driven through persistent contexts.
///
/// Both contexts are created once with the codec and released when it is
/// dropped. Compression is one-shot (whole block to whole frame).
/// Decompression feeds the frame through the streaming decoder until it
/// reports the frame complete; the decoder is reset at the start of every
/// call, so no state carries over between blocks.
pub struct ZstdStreamCodec {
    cctx: Compressor<'static>,
    dctx: Decoder<'static>,
}

impl ZstdStreamCodec {
    pub fn new() -> Result<Self, CodecError> {
        let init = |e: std::io::Error| CodecError::Init {
            codec: "zstd-stream",
            msg: e.to_string(),
        };
        Ok(Self {
            cctx: Compressor::new(ZSTD_FAST_LEVEL).map_err(init)?,
            dctx: Decoder::new().map_err(init)?,
        })
    }
}

fn decompress_err(msg: impl Into<String>) -> CodecError {
    CodecError::Decompress {
        codec: "zstd-stream",
        msg: msg.into(),
    }
}

impl Codec for ZstdStreamCodec {
    fn name(&self) -> &'static str {
        "zstd-stream"
    }

    fn compress_bound(&self, src_len: usize) -> usize {
        zstd::zstd_safe::compress_bound(src_len)
    }

    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        self.cctx
            .compress_to_buffer(src, dst)
            .map_err(|e| CodecError::Compress {
                codec: "zstd-stream",
                msg: e.to_string(),
            })
    }

    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        self.dctx.reinit().map_err(|e| decompress_err(e.to_string()))?;

        let dst_len = dst.len();
        let mut input = InBuffer::around(src);
        let mut output = OutBuffer::around(dst);
        loop {
            let (in_before, out_before) = (input.pos, output.pos());
            let hint = self
                .dctx
                .run(&mut input, &mut output)
                .map_err(|e| decompress_err(e.to_string()))?;
            if hint == 0 {
                break;
            }
            // stalled: either no room left for output or no input left to read
            if input.pos == in_before && output.pos() == out_before {
                return Err(decompress_err(if output.pos() == dst_len {
                    "destination too small for frame"
                } else {
                    "truncated frame"
                }));
            }
        }
        Ok(output.pos())
    }
}
