use fastcomp_codecs::rle;
use proptest::prelude::*;

fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    rle::encode(input, &mut out);
    out
}

fn decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    rle::decode(input, &mut out);
    out
}

/// Byte strings made of runs, some longer than one pair can hold.
fn runs() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec((any::<u8>(), 1usize..700), 0..20).prop_map(|runs| {
        runs.into_iter()
            .flat_map(|(b, n)| std::iter::repeat(b).take(n))
            .collect()
    })
}

proptest! {
    #[test]
    fn roundtrip_arbitrary(input in prop::collection::vec(any::<u8>(), 0..2048)) {
        prop_assert_eq!(decode(&encode(&input)), input);
    }

    #[test]
    fn roundtrip_long_runs(input in runs()) {
        let encoded = encode(&input);
        prop_assert!(encoded.len() <= rle::encoded_bound(input.len()));
        prop_assert_eq!(decode(&encoded), input);
    }

    #[test]
    fn pairs_are_well_formed(input in runs()) {
        let encoded = encode(&input);
        prop_assert_eq!(encoded.len() % 2, 0);
        prop_assert_eq!(encoded.is_empty(), input.is_empty());
        for pair in encoded.chunks_exact(2) {
            prop_assert!(pair[1] >= 1);
        }
    }

    #[test]
    fn no_adjacent_repeats_doubles(len in 0usize..2048, start in any::<u8>()) {
        let input: Vec<u8> = (0..len).map(|i| start.wrapping_add(i as u8)).collect();
        prop_assert_eq!(encode(&input).len(), 2 * len);
    }
}
