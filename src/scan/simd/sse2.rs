// Mon Oct 19 2026 - Alex

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{find_with, SimdLane};
use crate::pattern::CompiledPattern;

pub(crate) struct Sse2;

impl SimdLane for Sse2 {
    const WIDTH: usize = 16;
    type Vector = __m128i;

    #[inline(always)]
    unsafe fn broadcast(byte: u8) -> __m128i {
        _mm_set1_epi8(byte as i8)
    }

    #[inline(always)]
    unsafe fn load(ptr: *const u8) -> __m128i {
        _mm_loadu_si128(ptr as *const __m128i)
    }

    #[inline(always)]
    unsafe fn cmpeq(a: __m128i, b: __m128i) -> __m128i {
        _mm_cmpeq_epi8(a, b)
    }

    #[inline(always)]
    unsafe fn movemask(v: __m128i) -> u32 {
        _mm_movemask_epi8(v) as u32
    }
}

/// # Safety
///
/// The running CPU must support SSE2.
#[target_feature(enable = "sse2")]
pub unsafe fn find(region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    find_with::<Sse2>(region, pattern)
}
