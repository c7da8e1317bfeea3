// Mon Oct 19 2026 - Alex

use crate::memory::{Address, Segment};
use crate::pattern::{CompiledPattern, NamedPattern};
use crate::scan::{dispatch, Strategy};
use crate::utils::logging::ScopedTimer;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentMatch {
    pub segment: String,
    pub address: Address,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanHit {
    pub name: String,
    pub pattern: String,
    #[serde(flatten)]
    pub found: Option<SegmentMatch>,
}

impl ScanHit {
    pub fn is_found(&self) -> bool {
        self.found.is_some()
    }

    pub fn address(&self) -> Option<Address> {
        self.found.as_ref().map(|m| m.address)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SegmentScanner {
    strategy: Strategy,
    parallel: bool,
}

impl SegmentScanner {
    pub fn new() -> Self {
        Self {
            strategy: Strategy::Auto,
            parallel: true,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn find_in(&self, region: &[u8], pattern: &CompiledPattern) -> Option<usize> {
        dispatch::find_with(self.strategy, region, pattern)
    }

    pub fn find_all_in(&self, region: &[u8], pattern: &CompiledPattern) -> Vec<usize> {
        let mut results = Vec::new();
        let mut start = 0;

        while start < region.len() {
            match self.find_in(&region[start..], pattern) {
                Some(offset) => {
                    results.push(start + offset);
                    start += offset + 1;
                }
                None => break,
            }
        }

        results
    }

    pub fn find_in_segment(&self, segment: &Segment<'_>, pattern: &CompiledPattern) -> Option<SegmentMatch> {
        self.find_in(segment.data(), pattern).map(|offset| SegmentMatch {
            segment: segment.name().to_string(),
            address: segment.address_of(offset),
            offset,
        })
    }

    pub fn find(&self, segments: &[Segment<'_>], pattern: &CompiledPattern) -> Option<SegmentMatch> {
        segments
            .iter()
            .find_map(|segment| self.find_in_segment(segment, pattern))
    }

    pub fn find_all(&self, segments: &[Segment<'_>], pattern: &CompiledPattern) -> Vec<SegmentMatch> {
        segments
            .iter()
            .flat_map(|segment| {
                self.find_all_in(segment.data(), pattern)
                    .into_iter()
                    .map(move |offset| SegmentMatch {
                        segment: segment.name().to_string(),
                        address: segment.address_of(offset),
                        offset,
                    })
            })
            .collect()
    }

    pub fn scan_one(&self, segments: &[Segment<'_>], pattern: &NamedPattern) -> ScanHit {
        let found = self.find(segments, &pattern.pattern);
        match &found {
            Some(m) => log::debug!("{} found at {} ({}+0x{:x})", pattern.name, m.address, m.segment, m.offset),
            None => log::debug!("{} not found", pattern.name),
        }

        ScanHit {
            name: pattern.name.clone(),
            pattern: pattern.pattern.to_string(),
            found,
        }
    }

    pub fn scan_all(&self, segments: &[Segment<'_>], patterns: &[NamedPattern]) -> Vec<ScanHit> {
        self.scan_all_with(segments, patterns, |_| {})
    }

    pub fn scan_all_with<F>(&self, segments: &[Segment<'_>], patterns: &[NamedPattern], on_hit: F) -> Vec<ScanHit>
    where
        F: Fn(&ScanHit) + Sync,
    {
        let _timer = ScopedTimer::new("scan_all");

        let scan = |pattern: &NamedPattern| {
            let hit = self.scan_one(segments, pattern);
            on_hit(&hit);
            hit
        };

        if self.parallel {
            patterns.par_iter().map(scan).collect()
        } else {
            patterns.iter().map(scan).collect()
        }
    }
}

impl Default for SegmentScanner {
    fn default() -> Self {
        Self::new()
    }
}
