// Mon Oct 19 2026 - Alex

pub mod json;
pub mod report;

pub use json::{JsonError, JsonSerializer};
pub use report::ReportGenerator;

use crate::cpu::CpuTier;
use crate::memory::{Address, Segment};
use crate::scan::{ScanHit, Strategy};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentSummary {
    pub name: String,
    pub address: Address,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitEntry {
    pub name: String,
    pub pattern: String,
    pub address: Option<Address>,
    pub segment: Option<String>,
}

impl From<&ScanHit> for HitEntry {
    fn from(hit: &ScanHit) -> Self {
        Self {
            name: hit.name.clone(),
            pattern: hit.pattern.clone(),
            address: hit.address(),
            segment: hit.found.as_ref().map(|m| m.segment.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub tier: CpuTier,
    pub strategy: Strategy,
    pub target: String,
    pub segments: Vec<SegmentSummary>,
    pub hits: Vec<HitEntry>,
    pub found: usize,
    pub total: usize,
}

impl ScanReport {
    pub fn new(target: &str, tier: CpuTier, strategy: Strategy, segments: &[Segment<'_>], hits: &[ScanHit]) -> Self {
        let hits: Vec<HitEntry> = hits.iter().map(HitEntry::from).collect();
        Self {
            tier,
            strategy,
            target: target.to_string(),
            segments: segments
                .iter()
                .map(|s| SegmentSummary {
                    name: s.name().to_string(),
                    address: s.address(),
                    size: s.size(),
                })
                .collect(),
            found: hits.iter().filter(|h| h.address.is_some()).count(),
            total: hits.len(),
            hits,
        }
    }

    pub fn missing(&self) -> impl Iterator<Item = &HitEntry> {
        self.hits.iter().filter(|h| h.address.is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.found == self.total
    }
}
