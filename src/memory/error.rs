// Mon Oct 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Binary parse error: {0}")]
    BinaryParse(String),
    #[error("Process not found: {0}")]
    ProcessNotFound(String),
    #[error("Read failed at address 0x{0:x}")]
    ReadFailed(u64),
    #[error("Write failed at address 0x{0:x}")]
    WriteFailed(u64),
    #[error("Partial transfer at address 0x{address:x}: {done} of {requested} bytes")]
    PartialTransfer { address: u64, done: usize, requested: usize },
    #[error("Not supported: {0}")]
    Unsupported(String),
}
