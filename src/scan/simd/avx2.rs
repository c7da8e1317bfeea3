// Mon Oct 19 2026 - Alex

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{find_with, SimdLane};
use crate::pattern::CompiledPattern;

pub(crate) struct Avx2;

impl SimdLane for Avx2 {
    const WIDTH: usize = 32;
    type Vector = __m256i;

    #[inline(always)]
    unsafe fn broadcast(byte: u8) -> __m256i {
        _mm256_set1_epi8(byte as i8)
    }

    #[inline(always)]
    unsafe fn load(ptr: *const u8) -> __m256i {
        _mm256_loadu_si256(ptr as *const __m256i)
    }

    #[inline(always)]
    unsafe fn cmpeq(a: __m256i, b: __m256i) -> __m256i {
        _mm256_cmpeq_epi8(a, b)
    }

    #[inline(always)]
    unsafe fn movemask(v: __m256i) -> u32 {
        _mm256_movemask_epi8(v) as u32
    }
}

/// # Safety
///
/// The running CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn find(region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    find_with::<Avx2>(region, pattern)
}
