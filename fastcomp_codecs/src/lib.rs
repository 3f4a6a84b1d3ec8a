mod cascade;
mod deflate_codec;
mod lz4_codec;
mod lz4hc_codec;
mod lzo_codec;
pub mod rle;
mod zstd_codec;
mod zstd_stream;

pub use cascade::RleCascade;
pub use deflate_codec::{deflate_bound, DeflateCodec};
pub use lz4_codec::Lz4Codec;
pub use lz4hc_codec::{Lz4HcCodec, LZ4HC_LEVEL};
pub use lzo_codec::LzoCodec;
pub use zstd_codec::{ZstdCodec, ZSTD_FAST_LEVEL};
pub use zstd_stream::ZstdStreamCodec;

use fastcomp_core::{Codec, CodecError};
use tracing::warn;

/// Codec used when none is named.
pub const DEFAULT_CODEC: &str = "zstd";

/// Every token [`codec_by_name`] accepts.
pub const CODEC_NAMES: &[&str] = &[
    "zstd",
    "zstd-stream",
    "lz4",
    "lz4hc",
    "lzo",
    "lzo-rle",
    "842",
    "deflate",
];

/// Build a codec from its case-sensitive name token.
///
/// `level` only applies to `zstd`, where it is range-checked here. Any
/// configuration problem is reported before the caller has loaded or
/// compressed anything.
pub fn codec_by_name(name: &str, level: Option<i32>) -> Result<Box<dyn Codec>, CodecError> {
    let codec: Box<dyn Codec> = match name {
        "zstd" => match level {
            Some(level) => Box::new(ZstdCodec::new(level)?),
            None => Box::new(ZstdCodec::default()),
        },
        "zstd-stream" => Box::new(ZstdStreamCodec::new()?),
        "lz4" => Box::new(Lz4Codec),
        "lz4hc" => Box::new(Lz4HcCodec::default()),
        "lzo" => Box::new(LzoCodec::new()),
        "lzo-rle" => Box::new(RleCascade::new(LzoCodec::new(), "lzo-rle")),
        "842" | "deflate" => Box::new(DeflateCodec::new()),
        other => {
            return Err(CodecError::UnknownCodec {
                name: other.to_string(),
                valid: CODEC_NAMES.join(", "),
            })
        }
    };
    if let (Some(level), false) = (level, name == "zstd") {
        warn!(codec = name, level, "compression level only applies to zstd; ignored");
    }
    Ok(codec)
}
