// Mon Oct 19 2026 - Alex

use crate::pattern::{CompiledPattern, OptionalByte};

/// Two-phase scalar matcher: jump to the next anchor byte, then verify the rest.
///
/// Returns the same leftmost offset as [`super::brute::find`].
pub fn find(region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    let len = pattern.len();
    if len == 0 || region.len() < len {
        return None;
    }

    let last = region.len() - len;
    let anchor = pattern.anchor();
    let rest = &pattern.as_slice()[1..];

    let mut pos = 0;
    while pos <= last {
        let candidate = pos + region[pos..=last].iter().position(|&b| b == anchor)?;
        if verify(&region[candidate + 1..candidate + len], rest) {
            return Some(candidate);
        }
        pos = candidate + 1;
    }

    None
}

#[inline]
pub(crate) fn verify(window: &[u8], expected: &[OptionalByte]) -> bool {
    expected
        .iter()
        .zip(window.iter())
        .all(|(expected, &actual)| expected.map_or(true, |b| b == actual))
}
