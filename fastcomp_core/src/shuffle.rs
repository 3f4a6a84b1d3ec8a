//! Layout perturbation: permute the pages of the input arena.
//!
//! Used to break whatever locality the file layout had, so throughput can be
//! compared with and without it. Whole pages move; bytes inside a page don't.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::arena::Page;

/// Uniformly permute `pages` in place.
pub fn shuffle_pages<R: Rng + ?Sized>(pages: &mut [Page], rng: &mut R) {
    pages.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::arena::PAGE_SIZE;

    fn tagged_pages(n: usize) -> Vec<Page> {
        (0..n)
            .map(|i| {
                let mut p = Page([0u8; PAGE_SIZE]);
                p.0[0] = i as u8;
                p.0[PAGE_SIZE - 1] = !(i as u8);
                p
            })
            .collect()
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut pages = tagged_pages(64);
        shuffle_pages(&mut pages, &mut StdRng::seed_from_u64(7));

        let mut tags: Vec<u8> = pages.iter().map(|p| p.0[0]).collect();
        assert_ne!(tags, (0..64u8).collect::<Vec<_>>(), "64 pages should move with this seed");
        tags.sort_unstable();
        assert_eq!(tags, (0..64u8).collect::<Vec<_>>());

        for p in &pages {
            assert_eq!(p.0[PAGE_SIZE - 1], !p.0[0], "page contents must move as a unit");
        }
    }

    #[test]
    fn same_seed_same_order() {
        let mut a = tagged_pages(16);
        let mut b = tagged_pages(16);
        shuffle_pages(&mut a, &mut StdRng::seed_from_u64(99));
        shuffle_pages(&mut b, &mut StdRng::seed_from_u64(99));
        let ta: Vec<u8> = a.iter().map(|p| p.0[0]).collect();
        let tb: Vec<u8> = b.iter().map(|p| p.0[0]).collect();
        assert_eq!(ta, tb);
    }
}
