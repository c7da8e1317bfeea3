// Mon Oct 19 2026 - Alex

use crate::pattern::CompiledPattern;

/// Reference matcher: tries every offset and compares every pattern position.
///
/// O(n·m), but trivially correct, so the faster matchers are checked against it.
pub fn find(region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
    let pattern = pattern.as_slice();
    if pattern.is_empty() || region.len() < pattern.len() {
        return None;
    }

    'outer: for start in 0..=(region.len() - pattern.len()) {
        for (j, expected) in pattern.iter().enumerate() {
            if let Some(byte) = expected {
                if region[start + j] != *byte {
                    continue 'outer;
                }
            }
        }
        return Some(start);
    }

    None
}
