// Mon Oct 19 2026 - Alex

pub mod address;
pub mod error;
pub mod segment;
pub mod module;
#[cfg(target_os = "linux")]
pub mod process;

pub use address::Address;
pub use error::MemoryError;
pub use segment::{OwnedSegment, Segment, SegmentFlags};
pub use module::{ImageFormat, ModuleImage};
#[cfg(target_os = "linux")]
pub use process::{MemoryMap, ProcessMemory};
