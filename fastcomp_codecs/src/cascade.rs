use fastcomp_core::{Codec, CodecError};

use crate::rle;

/// Two-stage codec: a dictionary coder followed by the byte run-length stage.
///
/// ```text
/// compress   : src ──inner.compress──▶ stage ──rle::encode──▶ runs ──copy──▶ dst
/// decompress : src ──rle::decode──▶ stage ──inner.decompress(stage)──▶ dst
/// ```
///
/// The inner decoder is handed the run-length-decoded intermediate, never the
/// on-wire length. Both scratch buffers are owned by the instance and reused
/// across blocks.
///
/// Worst case is twice the inner coder's bound, which is more than a 2× block
/// slot; when the runs don't fit, `compress` fails with
/// [`CodecError::DstTooSmall`] and leaves `dst` untouched.
pub struct RleCascade<C> {
    inner: C,
    name: &'static str,
    stage: Vec<u8>,
    runs: Vec<u8>,
}

impl<C: Codec> RleCascade<C> {
    pub fn new(inner: C, name: &'static str) -> Self {
        Self {
            inner,
            name,
            stage: Vec::new(),
            runs: Vec::new(),
        }
    }
}

impl<C: Codec> Codec for RleCascade<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn compress_bound(&self, src_len: usize) -> usize {
        rle::encoded_bound(self.inner.compress_bound(src_len))
    }

    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        self.stage.resize(self.inner.compress_bound(src.len()), 0);
        let c1 = self.inner.compress(&mut self.stage, src)?;

        self.runs.clear();
        rle::encode(&self.stage[..c1], &mut self.runs);

        let n = self.runs.len();
        if n > dst.len() {
            return Err(CodecError::DstTooSmall {
                codec: self.name,
                needed: n,
                capacity: dst.len(),
            });
        }
        dst[..n].copy_from_slice(&self.runs);
        Ok(n)
    }

    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError> {
        self.stage.clear();
        rle::decode(src, &mut self.stage);
        self.inner.decompress(dst, &self.stage)
    }
}
