// Mon Oct 19 2026 - Alex

use crate::scan::Strategy;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vector instruction tier of the host CPU, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuTier {
    None,
    Sse2,
    Avx2,
}

static CPU_TIER: Lazy<CpuTier> = Lazy::new(|| {
    let tier = CpuTier::detect();
    log::debug!("Detected CPU tier: {}", tier);
    tier
});

/// Tier of the running CPU. Probed on first use, then read from the cache.
pub fn tier() -> CpuTier {
    *CPU_TIER
}

impl CpuTier {
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            // avx2 needs the 256-bit register file enabled as well
            if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("avx") {
                return Self::Avx2;
            }
            if is_x86_feature_detected!("sse2") {
                return Self::Sse2;
            }
        }

        Self::None
    }

    pub fn supports(self, strategy: Strategy) -> bool {
        match strategy {
            Strategy::Avx2 => self >= Self::Avx2,
            Strategy::Sse2 => self >= Self::Sse2,
            Strategy::Auto | Strategy::BruteForce | Strategy::Standard => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Sse2 => "SSE2",
            Self::Avx2 => "AVX2",
        }
    }

    pub fn all() -> [CpuTier; 3] {
        [Self::None, Self::Sse2, Self::Avx2]
    }
}

impl fmt::Display for CpuTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
