// Mon Oct 19 2026 - Alex

//! Vectorized first-byte scan with masked verification.
//!
//! The lane width is abstracted behind [`SimdLane`]; `sse2` and `avx2` supply
//! the 16- and 32-byte implementations. Patterns whose tail does not fit a
//! single vector load go to the standard matcher.

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse2;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod avx2;

use crate::cpu;
use crate::pattern::CompiledPattern;
use crate::scan::{standard, Strategy};

const MAX_WIDTH: usize = 32;

/// Width-specific vector primitives.
///
/// Implementations are only sound to call on CPUs that support the
/// instruction set they wrap.
pub(crate) trait SimdLane {
    const WIDTH: usize;
    type Vector: Copy;

    unsafe fn broadcast(byte: u8) -> Self::Vector;
    unsafe fn load(ptr: *const u8) -> Self::Vector;
    unsafe fn cmpeq(a: Self::Vector, b: Self::Vector) -> Self::Vector;
    /// One bit per lane, taken from each lane's high bit.
    unsafe fn movemask(v: Self::Vector) -> u32;

    #[inline(always)]
    fn first_set_bit(mask: u32) -> u32 {
        mask.trailing_zeros()
    }
}

pub(crate) struct MaskPair<L: SimdLane> {
    pub bytes: L::Vector,
    pub mask: L::Vector,
    pub mask_bits: u32,
}

impl<L: SimdLane> MaskPair<L> {
    // pattern.len() <= L::WIDTH + 1
    #[inline(always)]
    pub unsafe fn new(pattern: &CompiledPattern) -> Self {
        let mut bytes = [0u8; MAX_WIDTH];
        let mut mask = [0u8; MAX_WIDTH];

        for (lane, expected) in pattern.as_slice()[1..].iter().enumerate() {
            if let Some(byte) = expected {
                bytes[lane] = *byte;
                mask[lane] = 0xFF;
            }
        }

        let mask = L::load(mask.as_ptr());
        Self {
            bytes: L::load(bytes.as_ptr()),
            mask,
            mask_bits: L::movemask(mask),
        }
    }

    #[inline(always)]
    pub unsafe fn matches(&self, chunk: L::Vector) -> bool {
        let equal = L::movemask(L::cmpeq(self.bytes, chunk));
        equal & self.mask_bits == self.mask_bits
    }
}

/// Shared scan loop. Must be inlined into a `#[target_feature]` entry point.
#[inline(always)]
pub(crate) unsafe fn find_with<L: SimdLane>(region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    if pattern.len() > L::WIDTH + 1 {
        return standard::find(region, pattern);
    }

    let len = region.len();
    let ptr = region.as_ptr();
    let anchor = L::broadcast(pattern.anchor());
    let pair = MaskPair::<L>::new(pattern);

    // each candidate in a window reads WIDTH bytes past itself
    let mut window = 0;
    while window + 2 * L::WIDTH <= len {
        let mut candidates = L::movemask(L::cmpeq(anchor, L::load(ptr.add(window))));

        while candidates != 0 {
            let candidate = window + L::first_set_bit(candidates) as usize;
            if pair.matches(L::load(ptr.add(candidate + 1))) {
                return Some(candidate);
            }
            candidates &= candidates - 1;
        }

        window += L::WIDTH;
    }

    standard::find(&region[window..], pattern).map(|offset| window + offset)
}

pub fn find_sse2(region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if cpu::tier().supports(Strategy::Sse2) {
            // SAFETY: the running CPU reports SSE2
            return unsafe { sse2::find(region, pattern) };
        }
    }

    log::debug!("SSE2 matcher unavailable on {} tier, using standard", cpu::tier());
    standard::find(region, pattern)
}

pub fn find_avx2(region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if cpu::tier().supports(Strategy::Avx2) {
            // SAFETY: the running CPU reports AVX2
            return unsafe { avx2::find(region, pattern) };
        }
    }

    log::debug!("AVX2 matcher unavailable on {} tier, using standard", cpu::tier());
    standard::find(region, pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile;
    use crate::scan::brute;

    fn check(region: &[u8], sig: &str) {
        let pattern = compile(sig).unwrap();
        let expected = brute::find(region, &pattern);
        assert_eq!(find_sse2(region, &pattern), expected, "sse2 {}", sig);
        assert_eq!(find_avx2(region, &pattern), expected, "avx2 {}", sig);
    }

    #[test]
    fn test_short_regions() {
        for len in 0..80 {
            let mut region = vec![0u8; len];
            if len > 0 {
                region[len - 1] = 0xE8;
            }
            check(&region, "E8");
            check(&region, "E8 ?");
            check(&region, "00 E8");
        }
    }

    #[test]
    fn test_width_plus_one_at_last_offset() {
        for width in [16usize, 32] {
            let sig = std::iter::once("AB".to_string())
                .chain((0..width).map(|i| if i % 3 == 0 { "??".to_string() } else { format!("{:02X}", i) }))
                .collect::<Vec<_>>()
                .join(" ");
            let pattern = compile(&sig).unwrap();
            assert_eq!(pattern.len(), width + 1);

            for len in [width + 1, 2 * width, 2 * width + 1, 3 * width + 7, 200] {
                let mut region = vec![0xABu8; len];
                let start = len - pattern.len();
                for (j, expected) in pattern.iter().enumerate() {
                    region[start + j] = expected.unwrap_or(0xCD);
                }
                // break every earlier anchor so only the planted copy matches
                for byte in region[..start].iter_mut() {
                    *byte = 0x00;
                }

                assert_eq!(brute::find(&region, &pattern), Some(start));
                check(&region, &sig);
            }
        }
    }

    #[test]
    fn test_long_pattern_delegates() {
        let sig = (0..40).map(|i| format!("{:02X}", i + 1)).collect::<Vec<_>>().join(" ");
        let mut region = vec![0u8; 300];
        for i in 0..40 {
            region[123 + i] = (i + 1) as u8;
        }
        check(&region, &sig);
        assert_eq!(find_avx2(&region, &compile(&sig).unwrap()), Some(123));
    }

    #[test]
    fn test_dense_anchor_candidates() {
        // every byte is an anchor candidate, only one verifies
        let mut region = vec![0x90u8; 256];
        region[200] = 0xC3;
        check(&region, "90 90 C3");
        check(&region, "90 ? ? ? C3");
        check(&region, "90 ?? 90 90 90 90 90 90 90 90 90 90 90 90 90 90 C3");
    }
}
