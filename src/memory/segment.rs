// Mon Oct 19 2026 - Alex

use crate::memory::Address;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SegmentFlags: u32 {
        const READ = 1;
        const WRITE = 2;
        const EXECUTE = 4;
    }
}

impl SegmentFlags {
    pub fn is_code(self) -> bool {
        self.contains(Self::READ | Self::EXECUTE)
    }
}

impl fmt::Display for SegmentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.contains(Self::READ) { 'r' } else { '-' },
            if self.contains(Self::WRITE) { 'w' } else { '-' },
            if self.contains(Self::EXECUTE) { 'x' } else { '-' },
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    name: &'a str,
    address: Address,
    flags: SegmentFlags,
    data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn new(name: &'a str, address: Address, flags: SegmentFlags, data: &'a [u8]) -> Self {
        Self {
            name,
            address,
            flags,
            data,
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn end(&self) -> Address {
        self.address.offset(self.data.len())
    }

    pub fn flags(&self) -> SegmentFlags {
        self.flags
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.is_within_range(self.address, self.end())
    }

    pub fn address_of(&self, offset: usize) -> Address {
        self.address.offset(offset)
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} (size: 0x{:x})", self.address, self.flags, self.name, self.data.len())
    }
}

#[derive(Debug, Clone)]
pub struct OwnedSegment {
    pub name: String,
    pub address: Address,
    pub flags: SegmentFlags,
    pub data: Vec<u8>,
}

impl OwnedSegment {
    pub fn as_segment(&self) -> Segment<'_> {
        Segment::new(&self.name, self.address, self.flags, &self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_bounds() {
        let data = [0u8; 0x40];
        let segment = Segment::new(".text", Address::new(0x1000), SegmentFlags::READ | SegmentFlags::EXECUTE, &data);

        assert_eq!(segment.end(), Address::new(0x1040));
        assert!(segment.contains(Address::new(0x103F)));
        assert!(!segment.contains(Address::new(0x1040)));
        assert_eq!(segment.address_of(0x10), Address::new(0x1010));
        assert!(segment.flags().is_code());
        assert_eq!(segment.flags().to_string(), "r-x");
    }

    #[test]
    fn test_owned_segment_view() {
        let owned = OwnedSegment {
            name: "[anon]".to_string(),
            address: Address::new(0x7000),
            flags: SegmentFlags::READ,
            data: vec![1, 2, 3],
        };
        let view = owned.as_segment();
        assert_eq!(view.name(), "[anon]");
        assert_eq!(view.data(), &[1, 2, 3]);
        assert!(!view.flags().is_code());
    }
}
