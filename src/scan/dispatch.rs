// Mon Oct 19 2026 - Alex

use crate::cpu::{self, CpuTier};
use crate::pattern::CompiledPattern;
use crate::scan::{brute, simd, standard, Strategy};

pub const SSE2_MAX_PATTERN_LEN: usize = 17;
pub const AVX2_MAX_PATTERN_LEN: usize = 33;

/// Picks the matcher for a pattern of `len` bytes on a CPU of `tier`.
pub fn select(tier: CpuTier, len: usize) -> Strategy {
    if tier == CpuTier::Avx2 && len <= AVX2_MAX_PATTERN_LEN {
        Strategy::Avx2
    } else if tier >= CpuTier::Sse2 && len <= SSE2_MAX_PATTERN_LEN {
        Strategy::Sse2
    } else {
        Strategy::Standard
    }
}

pub fn find(region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    find_with_tier(cpu::tier(), region, pattern)
}

/// Same as [`find`] but selects as if running on `tier`.
///
/// Selecting a tier above the host's still returns the right answer; the
/// vector matcher falls back to the scalar one.
pub fn find_with_tier(tier: CpuTier, region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    find_with(select(tier, pattern.len()), region, pattern)
}

pub fn find_with(strategy: Strategy, region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    match strategy {
        Strategy::Auto => find(region, pattern),
        Strategy::BruteForce => brute::find(region, pattern),
        Strategy::Standard => standard::find(region, pattern),
        Strategy::Sse2 => simd::find_sse2(region, pattern),
        Strategy::Avx2 => simd::find_avx2(region, pattern),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile;

    // xorshift, so the corpus is the same on every run
    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn below(&mut self, n: usize) -> usize {
            (self.next() % n as u64) as usize
        }
    }

    fn random_case(rng: &mut Rng) -> (Vec<u8>, CompiledPattern) {
        // small alphabet keeps anchors and partial matches frequent
        let alphabet = 1 + rng.below(6);
        let region: Vec<u8> = (0..rng.below(300)).map(|_| rng.below(alphabet) as u8).collect();

        let len = 1 + rng.below(40);
        let mut bytes: Vec<Option<u8>> = (0..len)
            .map(|_| if rng.below(4) == 0 { None } else { Some(rng.below(alphabet) as u8) })
            .collect();
        bytes[0] = Some(rng.below(alphabet) as u8);

        if region.len() >= len && rng.below(2) == 0 {
            let at = rng.below(region.len() - len + 1);
            let mut planted = region.clone();
            for (j, b) in bytes.iter().enumerate() {
                if let Some(b) = b {
                    planted[at + j] = *b;
                }
            }
            return (planted, CompiledPattern::new(bytes).unwrap());
        }

        (region, CompiledPattern::new(bytes).unwrap())
    }

    #[test]
    fn test_select_thresholds() {
        assert_eq!(select(CpuTier::Avx2, 1), Strategy::Avx2);
        assert_eq!(select(CpuTier::Avx2, 33), Strategy::Avx2);
        assert_eq!(select(CpuTier::Avx2, 34), Strategy::Standard);
        assert_eq!(select(CpuTier::Sse2, 17), Strategy::Sse2);
        assert_eq!(select(CpuTier::Sse2, 18), Strategy::Standard);
        assert_eq!(select(CpuTier::Sse2, 33), Strategy::Standard);
        assert_eq!(select(CpuTier::None, 4), Strategy::Standard);
    }

    #[test]
    fn test_all_matchers_agree() {
        let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
        for _ in 0..3000 {
            let (region, pattern) = random_case(&mut rng);
            let expected = brute::find(&region, &pattern);

            for strategy in Strategy::all() {
                assert_eq!(
                    find_with(strategy, &region, &pattern),
                    expected,
                    "{} on {} bytes with {}",
                    strategy,
                    region.len(),
                    pattern
                );
            }
            for tier in CpuTier::all() {
                assert_eq!(find_with_tier(tier, &region, &pattern), expected);
            }
        }
    }

    #[test]
    fn test_wildcard_monotonicity() {
        let mut rng = Rng(0xDEAD_BEEF_CAFE_F00D);
        for _ in 0..500 {
            let (region, pattern) = random_case(&mut rng);
            let Some(found) = find(&region, &pattern) else {
                continue;
            };

            let mut loosened = pattern.as_slice().to_vec();
            let index = 1 + rng.below(loosened.len().max(2) - 1);
            if index < loosened.len() {
                loosened[index] = None;
            }
            let loosened = CompiledPattern::new(loosened).unwrap();

            let relaxed = find(&region, &loosened);
            assert!(relaxed.is_some());
            assert!(relaxed.unwrap() <= found);
        }
    }

    #[test]
    fn test_planted_signature_scenario() {
        let mut region: Vec<u8> = (0..512u32).map(|i| (i % 7) as u8).collect();
        let sig = "48 8B ? ? 89 5C 24 ? 57 48 83 EC";
        let planted = [0x48, 0x8B, 0x05, 0x11, 0x89, 0x5C, 0x24, 0x08, 0x57, 0x48, 0x83, 0xEC];
        let mut near = planted;
        near[9] = 0x49;

        region[40..52].copy_from_slice(&near);
        region[137..149].copy_from_slice(&planted);
        region[301..313].copy_from_slice(&near);

        let pattern = compile(sig).unwrap();
        assert_eq!(pattern.len(), 12);
        assert_eq!(pattern.wildcard_byte_count(), 3);
        for strategy in Strategy::all() {
            assert_eq!(find_with(strategy, &region, &pattern), Some(137), "{}", strategy);
        }
        assert_eq!(find(&region[138..], &pattern), None);
    }

    #[test]
    fn test_leftmost_of_overlapping() {
        let region = [0x00, 0xAA, 0xAA, 0xAA, 0xAA, 0xBB, 0x00];
        let pattern = compile("AA ? AA").unwrap();
        for strategy in Strategy::all() {
            assert_eq!(find_with(strategy, &region, &pattern), Some(1));
        }
    }

    #[test]
    fn test_pattern_longer_than_region() {
        let pattern = compile("01 02 03 04 05").unwrap();
        for strategy in Strategy::all() {
            assert_eq!(find_with(strategy, &[0x01, 0x02, 0x03, 0x04], &pattern), None);
            assert_eq!(find_with(strategy, &[], &pattern), None);
        }
    }

    #[test]
    fn test_concurrent_find_on_shared_region() {
        let region: std::sync::Arc<Vec<u8>> =
            std::sync::Arc::new((0..8192u32).map(|i| (i % 256) as u8).collect());
        let pattern = std::sync::Arc::new(compile("C7 ? C9 CA").unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let region = region.clone();
                let pattern = pattern.clone();
                std::thread::spawn(move || find(&region, &pattern))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(199));
        }
    }
}
