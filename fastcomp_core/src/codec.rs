use crate::error::CodecError;

/// Core compression abstraction.
///
/// Each `Codec` implementation:
/// - Reports its canonical token from `name()`. A codec selected through an
///   alias reports the canonical token, not the alias.
/// - Writes into a caller-provided destination. `dst.len()` is the capacity;
///   the caller sizes it, the codec never writes past it.
/// - Produces raw coder output with no framing or length prefix. `decompress`
///   must be given exactly the bytes a matching `compress` returned, not a
///   padded slot.
///
/// Methods take `&mut self` so adapters can own persistent contexts and
/// scratch memory. A parallel driver gives each worker its own instance.
pub trait Codec {
    /// Canonical selection token.
    fn name(&self) -> &'static str;

    /// Worst-case compressed size for `src_len` input bytes.
    fn compress_bound(&self, src_len: usize) -> usize;

    /// Compress `src` into `dst`, returning the number of bytes written.
    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError>;

    /// Decompress the exact compressed bytes `src` into `dst`, returning the
    /// number of bytes written.
    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, CodecError>;
}
