// Mon Oct 19 2026 - Alex

use crate::pattern::PatternError;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

pub type OptionalByte = Option<u8>;

/// Compiled signature. Always non-empty and always starts with a concrete byte,
/// which every matcher uses as its fast-path anchor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompiledPattern {
    bytes: Vec<OptionalByte>,
}

impl CompiledPattern {
    pub fn new(bytes: Vec<OptionalByte>) -> Result<Self, PatternError> {
        match bytes.first() {
            Some(Some(_)) => Ok(Self { bytes }),
            _ => Err(PatternError::Anchor),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PatternError> {
        Self::new(bytes.iter().copied().map(Some).collect())
    }

    /// Builds a pattern from raw bytes and an IDA-style byte mask (0x00 = wildcard).
    pub fn with_mask(bytes: &[u8], byte_mask: &[u8]) -> Result<Self, PatternError> {
        if bytes.len() != byte_mask.len() {
            return Err(PatternError::MaskMismatch {
                bytes: bytes.len(),
                mask: byte_mask.len(),
            });
        }

        Self::new(
            bytes
                .iter()
                .zip(byte_mask.iter())
                .map(|(&b, &m)| if m != 0 { Some(b) } else { None })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn anchor(&self) -> u8 {
        // construction guarantees a concrete first element
        self.bytes[0].unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[OptionalByte] {
        &self.bytes
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionalByte> {
        self.bytes.iter()
    }

    pub fn get(&self, index: usize) -> Option<OptionalByte> {
        self.bytes.get(index).copied()
    }

    pub fn matches(&self, window: &[u8]) -> bool {
        window.len() >= self.bytes.len()
            && self
                .bytes
                .iter()
                .zip(window.iter())
                .all(|(expected, &actual)| expected.map_or(true, |b| b == actual))
    }

    pub fn significant_byte_count(&self) -> usize {
        self.bytes.iter().filter(|b| b.is_some()).count()
    }

    pub fn wildcard_byte_count(&self) -> usize {
        self.bytes.iter().filter(|b| b.is_none()).count()
    }

    pub fn to_hex_string(&self) -> String {
        self.bytes
            .iter()
            .map(|b| match b {
                Some(b) => format!("{:02X}", b),
                None => "??".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Byte mask in the 0xFF = fixed / 0x00 = wildcard convention.
    pub fn mask_as_bytes(&self) -> Vec<u8> {
        self.bytes
            .iter()
            .map(|b| if b.is_some() { 0xFF } else { 0x00 })
            .collect()
    }
}

impl Index<usize> for CompiledPattern {
    type Output = OptionalByte;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bytes[index]
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

impl FromStr for CompiledPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::pattern::compile(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPattern {
    pub name: String,
    pub pattern: CompiledPattern,
}

impl NamedPattern {
    pub fn new(name: &str, pattern: CompiledPattern) -> Self {
        Self {
            name: name.to_string(),
            pattern,
        }
    }
}

impl fmt::Display for NamedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_anchor() {
        assert_eq!(CompiledPattern::new(vec![]), Err(PatternError::Anchor));
        assert_eq!(CompiledPattern::new(vec![None, Some(0x90)]), Err(PatternError::Anchor));
        assert!(CompiledPattern::new(vec![Some(0x90), None]).is_ok());
    }

    #[test]
    fn test_with_mask() {
        let pattern = CompiledPattern::with_mask(&[0x48, 0x00, 0x5C], &[0xFF, 0x00, 0xFF]).unwrap();
        assert_eq!(pattern.as_slice(), &[Some(0x48), None, Some(0x5C)]);
        assert_eq!(pattern.mask_as_bytes(), vec![0xFF, 0x00, 0xFF]);
        assert!(CompiledPattern::with_mask(&[0x48], &[0xFF, 0xFF]).is_err());
        assert!(CompiledPattern::with_mask(&[0x48, 0x89], &[0x00, 0xFF]).unwrap_err().is_anchor());
    }

    #[test]
    fn test_matches_window() {
        let pattern = CompiledPattern::new(vec![Some(0xE8), None, None, Some(0xC3)]).unwrap();
        assert!(pattern.matches(&[0xE8, 0x01, 0x02, 0xC3]));
        assert!(pattern.matches(&[0xE8, 0xFF, 0xFF, 0xC3, 0x00]));
        assert!(!pattern.matches(&[0xE8, 0x01, 0x02, 0xC4]));
        assert!(!pattern.matches(&[0xE8, 0x01, 0x02]));
    }

    #[test]
    fn test_display_and_counts() {
        let pattern = CompiledPattern::new(vec![Some(0x55), None, Some(0x0a)]).unwrap();
        assert_eq!(pattern.to_string(), "55 ?? 0A");
        assert_eq!(pattern.anchor(), 0x55);
        assert_eq!(pattern.significant_byte_count(), 2);
        assert_eq!(pattern.wildcard_byte_count(), 1);
        assert_eq!(pattern[1], None);
        assert_eq!(pattern.get(3), None);
    }
}
