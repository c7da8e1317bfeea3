// Mon Oct 19 2026 - Alex

pub mod config;
pub mod cpu;
pub mod memory;
pub mod output;
pub mod pattern;
pub mod scan;
pub mod utils;

pub use config::{ConfigError, ScanConfig};
pub use cpu::CpuTier;
pub use memory::{Address, MemoryError, ModuleImage, Segment};
pub use pattern::{compile, CompiledPattern, NamedPattern, PatternCompiler, PatternError};
pub use scan::{find, SegmentScanner, Strategy};
