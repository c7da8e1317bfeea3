// Mon Oct 19 2026 - Alex

use crate::memory::{Address, MemoryError, OwnedSegment, SegmentFlags};
use libc::{c_void, iovec, pid_t};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryMap {
    pub start: Address,
    pub end: Address,
    pub flags: SegmentFlags,
    pub offset: u64,
    pub path: Option<String>,
}

impl MemoryMap {
    pub fn size(&self) -> u64 {
        self.end.as_u64() - self.start.as_u64()
    }

    pub fn name(&self) -> String {
        self.path.clone().unwrap_or_else(|| format!("[anon:{}]", self.start))
    }

    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let (start, end) = fields.next()?.split_once('-')?;
        let perms = fields.next()?.as_bytes();
        let offset = u64::from_str_radix(fields.next()?, 16).ok()?;
        let _dev = fields.next()?;
        let _inode = fields.next()?;
        let path = fields.collect::<Vec<_>>().join(" ");

        let mut flags = SegmentFlags::empty();
        if perms.first() == Some(&b'r') {
            flags |= SegmentFlags::READ;
        }
        if perms.get(1) == Some(&b'w') {
            flags |= SegmentFlags::WRITE;
        }
        if perms.get(2) == Some(&b'x') {
            flags |= SegmentFlags::EXECUTE;
        }

        Some(Self {
            start: Address::parse_hex(start)?,
            end: Address::parse_hex(end)?,
            flags,
            offset,
            path: if path.is_empty() { None } else { Some(path) },
        })
    }
}

pub struct ProcessMemory {
    pid: pid_t,
}

impl ProcessMemory {
    pub fn attach(pid: u32) -> Result<Self, MemoryError> {
        let pid = pid_t::try_from(pid)
            .map_err(|_| MemoryError::ProcessNotFound(format!("Invalid pid {}", pid)))?;

        if !Self::proc_path(pid).exists() {
            return Err(MemoryError::ProcessNotFound(format!("Process {} not found", pid)));
        }

        log::debug!("Attached to process {}", pid);
        Ok(Self { pid })
    }

    pub fn current() -> Self {
        Self {
            pid: std::process::id() as pid_t,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid as u32
    }

    fn proc_path(pid: pid_t) -> PathBuf {
        PathBuf::from(format!("/proc/{}", pid))
    }

    pub fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let mut buffer = vec![0u8; len];
        self.read_into(addr, &mut buffer)?;
        Ok(buffer)
    }

    pub fn read_into(&self, addr: Address, buffer: &mut [u8]) -> Result<(), MemoryError> {
        if buffer.is_empty() {
            return Ok(());
        }

        let local = iovec {
            iov_base: buffer.as_mut_ptr() as *mut c_void,
            iov_len: buffer.len(),
        };
        let remote = iovec {
            iov_base: addr.as_u64() as usize as *mut c_void,
            iov_len: buffer.len(),
        };

        // SAFETY: `local` covers exactly `buffer`; the remote side is validated by the kernel
        let read = unsafe { libc::process_vm_readv(self.pid, &local, 1, &remote, 1, 0) };
        if read < 0 {
            log::debug!("process_vm_readv failed: {}", std::io::Error::last_os_error());
            return Err(MemoryError::ReadFailed(addr.as_u64()));
        }
        if read as usize != buffer.len() {
            return Err(MemoryError::PartialTransfer {
                address: addr.as_u64(),
                done: read as usize,
                requested: buffer.len(),
            });
        }

        Ok(())
    }

    pub fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        if data.is_empty() {
            return Ok(());
        }

        let local = iovec {
            iov_base: data.as_ptr() as *mut c_void,
            iov_len: data.len(),
        };
        let remote = iovec {
            iov_base: addr.as_u64() as usize as *mut c_void,
            iov_len: data.len(),
        };

        // SAFETY: the kernel only reads from `local`, which covers exactly `data`
        let written = unsafe { libc::process_vm_writev(self.pid, &local, 1, &remote, 1, 0) };
        if written < 0 {
            log::debug!("process_vm_writev failed: {}", std::io::Error::last_os_error());
            return Err(MemoryError::WriteFailed(addr.as_u64()));
        }
        if written as usize != data.len() {
            return Err(MemoryError::PartialTransfer {
                address: addr.as_u64(),
                done: written as usize,
                requested: data.len(),
            });
        }

        Ok(())
    }

    pub fn read_u32(&self, addr: Address) -> Result<u32, MemoryError> {
        let mut bytes = [0u8; 4];
        self.read_into(addr, &mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        let mut bytes = [0u8; 8];
        self.read_into(addr, &mut bytes)?;
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn maps(&self) -> Result<Vec<MemoryMap>, MemoryError> {
        let maps = fs::read_to_string(Self::proc_path(self.pid).join("maps"))?;
        Ok(maps.lines().filter_map(MemoryMap::parse).collect())
    }

    pub fn executable_regions(&self) -> Result<Vec<MemoryMap>, MemoryError> {
        Ok(self
            .maps()?
            .into_iter()
            .filter(|m| m.flags.is_code())
            .collect())
    }

    pub fn read_segments(&self) -> Result<Vec<OwnedSegment>, MemoryError> {
        let mut segments = Vec::new();

        for region in self.executable_regions()? {
            match self.read_bytes(region.start, region.size() as usize) {
                Ok(data) => segments.push(OwnedSegment {
                    name: region.name(),
                    address: region.start,
                    flags: region.flags,
                    data,
                }),
                Err(e) => log::debug!("Skipping {} at {}: {}", region.name(), region.start, e),
            }
        }

        log::info!("pid {} | executable segments:{}", self.pid, segments.len());
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_maps_line() {
        let map = MemoryMap::parse(
            "55d0c6a00000-55d0c6a21000 r-xp 00002000 08:01 1234                       /usr/bin/cat",
        )
        .unwrap();

        assert_eq!(map.start, Address::new(0x55d0_c6a0_0000));
        assert_eq!(map.size(), 0x21000);
        assert_eq!(map.offset, 0x2000);
        assert!(map.flags.is_code());
        assert_eq!(map.path.as_deref(), Some("/usr/bin/cat"));

        let anon = MemoryMap::parse("7ffd1000-7ffd2000 rw-p 00000000 00:00 0").unwrap();
        assert_eq!(anon.path, None);
        assert_eq!(anon.flags, SegmentFlags::READ | SegmentFlags::WRITE);

        assert!(MemoryMap::parse("garbage").is_none());
    }

    #[test]
    fn test_read_own_memory() {
        let data: Vec<u8> = (0..64u8).collect();
        let process = ProcessMemory::current();

        let read = process.read_bytes(Address::from_ptr(data.as_ptr()), data.len()).unwrap();
        assert_eq!(read, data);

        let word = process.read_u32(Address::from_ptr(data[4..].as_ptr())).unwrap();
        assert_eq!(word, u32::from_le_bytes([4, 5, 6, 7]));
    }

    #[test]
    fn test_write_own_memory() {
        let mut target = vec![0u8; 16];
        let process = ProcessMemory::current();
        let addr = Address::from_ptr(target.as_mut_ptr());

        process.write_bytes(addr, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert_eq!(process.read_bytes(addr, 4).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_read_unmapped_fails() {
        let process = ProcessMemory::current();
        assert!(process.read_bytes(Address::new(0x8), 16).is_err());
    }

    #[test]
    fn test_executable_regions_of_self() {
        let process = ProcessMemory::current();
        let regions = process.executable_regions().unwrap();
        assert!(!regions.is_empty());
        assert!(regions.iter().all(|r| r.flags.is_code()));

        let segments = process.read_segments().unwrap();
        assert!(!segments.is_empty());
    }

    #[test]
    fn test_attach_missing_process() {
        assert!(ProcessMemory::attach(u32::MAX).is_err());
    }
}
