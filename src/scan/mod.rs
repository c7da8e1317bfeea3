// Mon Oct 19 2026 - Alex

pub mod brute;
pub mod standard;
pub mod simd;
pub mod dispatch;
pub mod scanner;

pub use dispatch::{find, find_with, find_with_tier, select};
pub use scanner::{ScanHit, SegmentMatch, SegmentScanner};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which matcher runs a search. `Auto` picks one from the CPU tier and pattern length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    Auto,
    BruteForce,
    Standard,
    Sse2,
    Avx2,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::BruteForce => "brute-force",
            Self::Standard => "standard",
            Self::Sse2 => "sse2",
            Self::Avx2 => "avx2",
        }
    }

    pub fn lane_width(self) -> Option<usize> {
        match self {
            Self::Sse2 => Some(16),
            Self::Avx2 => Some(32),
            _ => None,
        }
    }

    /// Longest pattern the strategy handles without delegating to `Standard`.
    pub fn max_pattern_len(self) -> Option<usize> {
        self.lane_width().map(|width| width + 1)
    }

    pub fn all() -> [Strategy; 5] {
        [Self::Auto, Self::BruteForce, Self::Standard, Self::Sse2, Self::Avx2]
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "brute-force" | "brute" | "bruteforce" => Ok(Self::BruteForce),
            "standard" | "std" => Ok(Self::Standard),
            "sse2" | "sse" => Ok(Self::Sse2),
            "avx2" => Ok(Self::Avx2),
            _ => Err(format!("unknown strategy '{}'", s)),
        }
    }
}
