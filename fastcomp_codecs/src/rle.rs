//! Byte run-length stage.
//!
//! Wire format: a sequence of `(byte, run_length)` pairs, `run_length` in
//! `1..=255`. Every run is emitted, including runs of one, so output is at
//! most twice the input and never empty for non-empty input. Longer runs are
//! split into several pairs of the same byte.

/// Longest run a single pair can carry.
pub const MAX_RUN: usize = u8::MAX as usize;

/// Worst-case encoded size for `len` input bytes.
#[inline]
pub fn encoded_bound(len: usize) -> usize {
    len * 2
}

/// Append the run-length encoding of `input` to `out`.
pub fn encode(input: &[u8], out: &mut Vec<u8>) {
    let mut rest = input;
    while let Some(&byte) = rest.first() {
        let run = rest.iter().take(MAX_RUN).take_while(|&&b| b == byte).count();
        out.push(byte);
        out.push(run as u8);
        rest = &rest[run..];
    }
}

/// Append the expansion of `input` to `out`.
///
/// Assumes well-formed pairs; a trailing odd byte is ignored.
pub fn decode(input: &[u8], out: &mut Vec<u8>) {
    for pair in input.chunks_exact(2) {
        let (byte, run) = (pair[0], pair[1] as usize);
        out.resize(out.len() + run, byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(input: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        encode(input, &mut out);
        out
    }

    fn dec(input: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        decode(input, &mut out);
        out
    }

    #[test]
    fn empty_encodes_to_nothing() {
        assert!(enc(&[]).is_empty());
        assert!(dec(&[]).is_empty());
    }

    #[test]
    fn single_byte_is_one_pair() {
        assert_eq!(enc(&[0x42]), vec![0x42, 1]);
    }

    #[test]
    fn runs_are_collapsed() {
        assert_eq!(enc(b"aaabcc"), vec![b'a', 3, b'b', 1, b'c', 2]);
        assert_eq!(dec(&[b'a', 3, b'b', 1, b'c', 2]), b"aaabcc");
    }

    #[test]
    fn long_runs_split_at_255() {
        let input = vec![9u8; 600];
        let encoded = enc(&input);
        assert_eq!(encoded, vec![9, 255, 9, 255, 9, 90]);
        assert_eq!(dec(&encoded), input);
    }

    #[test]
    fn run_of_exactly_255_is_one_pair() {
        assert_eq!(enc(&[1u8; 255]), vec![1, 255]);
        assert_eq!(enc(&[1u8; 256]), vec![1, 255, 1, 1]);
    }

    #[test]
    fn non_repeating_input_doubles() {
        let input: Vec<u8> = (0..=255u8).collect();
        let encoded = enc(&input);
        assert_eq!(encoded.len(), encoded_bound(input.len()));
        assert_eq!(dec(&encoded), input);
    }

    #[test]
    fn trailing_odd_byte_is_ignored() {
        assert_eq!(dec(&[7, 2, 8]), vec![7, 7]);
    }

    #[test]
    fn encode_appends() {
        let mut out = vec![0xEE];
        encode(b"zz", &mut out);
        assert_eq!(out, vec![0xEE, b'z', 2]);
    }
}
