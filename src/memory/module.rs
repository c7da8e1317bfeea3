// Mon Oct 19 2026 - Alex

use crate::memory::{Address, MemoryError, Segment, SegmentFlags};
use goblin::elf::program_header::PT_LOAD;
use goblin::elf::section_header::{SHF_ALLOC, SHF_EXECINSTR, SHF_WRITE, SHT_NOBITS};
use goblin::elf::Elf;
use goblin::mach::constants::{SECTION_TYPE, S_ZEROFILL};
use goblin::mach::{Mach, MachO};
use goblin::pe::section_table::{IMAGE_SCN_MEM_EXECUTE, IMAGE_SCN_MEM_READ, IMAGE_SCN_MEM_WRITE};
use goblin::pe::PE;
use goblin::Object;
use memmap2::Mmap;
use std::fmt;
use std::fs::File;
use std::ops::{Deref, Range};
use std::path::{Path, PathBuf};

const VM_PROT_READ: u32 = 0x1;
const VM_PROT_WRITE: u32 = 0x2;
const VM_PROT_EXECUTE: u32 = 0x4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Elf,
    Pe,
    MachO,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elf => write!(f, "ELF"),
            Self::Pe => write!(f, "PE"),
            Self::MachO => write!(f, "Mach-O"),
        }
    }
}

enum ImageData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for ImageData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(mmap) => mmap,
            Self::Owned(bytes) => bytes,
        }
    }
}

#[derive(Debug, Clone)]
struct SectionInfo {
    name: String,
    vaddr: u64,
    flags: SegmentFlags,
    file_range: Range<usize>,
}

struct ParsedImage {
    format: ImageFormat,
    preferred_base: u64,
    size: u64,
    sections: Vec<SectionInfo>,
}

pub struct ModuleImage {
    data: ImageData,
    path: Option<PathBuf>,
    format: ImageFormat,
    base: Address,
    preferred_base: Address,
    size: u64,
    sections: Vec<SectionInfo>,
}

impl ModuleImage {
    /// Maps `path` and relocates its code sections to `base` (or the image's
    /// own preferred base when `None`).
    pub fn load<P: AsRef<Path>>(path: P, base: Option<Address>) -> Result<Self, MemoryError> {
        let file = File::open(path.as_ref())?;
        // SAFETY: the mapping is read-only and owned by the image for its whole lifetime
        let mmap = unsafe { Mmap::map(&file) }?;
        Self::build(ImageData::Mapped(mmap), Some(path.as_ref().to_path_buf()), base)
    }

    pub fn from_bytes(bytes: Vec<u8>, base: Option<Address>) -> Result<Self, MemoryError> {
        Self::build(ImageData::Owned(bytes), None, base)
    }

    fn build(data: ImageData, path: Option<PathBuf>, base: Option<Address>) -> Result<Self, MemoryError> {
        let parsed = parse_image(&data)?;
        let preferred_base = Address::new(parsed.preferred_base);
        let base = base.unwrap_or(preferred_base);

        let image = Self {
            data,
            path,
            format: parsed.format,
            base,
            preferred_base,
            size: parsed.size,
            sections: parsed.sections,
        };

        log::info!(
            "{} | format:{} | base_addr:{} | size:0x{:x} | segments:{}",
            image.display_name(),
            image.format,
            image.base,
            image.size,
            image.sections.len()
        );

        Ok(image)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<memory>".to_string())
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn preferred_base(&self) -> Address {
        self.preferred_base
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn segments(&self) -> Vec<Segment<'_>> {
        self.sections
            .iter()
            .map(|section| {
                Segment::new(
                    &section.name,
                    self.relocate(section.vaddr),
                    section.flags,
                    &self.data[section.file_range.clone()],
                )
            })
            .collect()
    }

    pub fn segment(&self, name: &str) -> Option<Segment<'_>> {
        self.segments().into_iter().find(|s| s.name() == name)
    }

    pub fn read(&self, addr: Address, len: usize) -> Option<&[u8]> {
        self.segments().into_iter().find_map(|segment| {
            if !segment.contains(addr) {
                return None;
            }
            let start = (addr - segment.address()) as usize;
            segment.data().get(start..start.checked_add(len)?)
        })
    }

    fn relocate(&self, vaddr: u64) -> Address {
        Address::new(
            vaddr
                .wrapping_sub(self.preferred_base.as_u64())
                .wrapping_add(self.base.as_u64()),
        )
    }
}

fn parse_image(data: &[u8]) -> Result<ParsedImage, MemoryError> {
    let object = Object::parse(data)
        .map_err(|e| MemoryError::BinaryParse(format!("Failed to parse image: {}", e)))?;

    match object {
        Object::Elf(elf) => parse_elf(&elf, data.len()),
        Object::PE(pe) => parse_pe(&pe, data.len()),
        Object::Mach(Mach::Binary(macho)) => parse_macho(&macho, data.len()),
        Object::Mach(Mach::Fat(_)) => Err(MemoryError::BinaryParse(
            "Fat binaries not supported".to_string(),
        )),
        _ => Err(MemoryError::Unsupported("unrecognized image format".to_string())),
    }
}

fn file_range(offset: u64, size: u64, file_len: usize) -> Option<Range<usize>> {
    let start = usize::try_from(offset).ok()?;
    if start >= file_len || size == 0 {
        return None;
    }
    let end = start.saturating_add(usize::try_from(size).ok()?).min(file_len);
    Some(start..end)
}

fn span_end(what: &str, addr: u64, size: u64) -> Result<u64, MemoryError> {
    addr.checked_add(size).ok_or_else(|| {
        MemoryError::BinaryParse(format!("{} at 0x{:x} + 0x{:x} overflows the address space", what, addr, size))
    })
}

fn parse_elf(elf: &Elf, file_len: usize) -> Result<ParsedImage, MemoryError> {
    let loads = elf.program_headers.iter().filter(|ph| ph.p_type == PT_LOAD);
    let preferred_base = loads.clone().map(|ph| ph.p_vaddr).min().unwrap_or(0);

    let mut end = preferred_base;
    for ph in loads {
        end = end.max(span_end("PT_LOAD", ph.p_vaddr, ph.p_memsz)?);
    }

    let sections = elf
        .section_headers
        .iter()
        .filter(|sh| {
            sh.sh_type != SHT_NOBITS
                && sh.sh_flags & u64::from(SHF_ALLOC) != 0
                && sh.sh_flags & u64::from(SHF_EXECINSTR) != 0
        })
        .filter_map(|sh| {
            let mut flags = SegmentFlags::READ | SegmentFlags::EXECUTE;
            if sh.sh_flags & u64::from(SHF_WRITE) != 0 {
                flags |= SegmentFlags::WRITE;
            }
            Some(SectionInfo {
                name: elf.shdr_strtab.get_at(sh.sh_name).unwrap_or("").to_string(),
                vaddr: sh.sh_addr,
                flags,
                file_range: file_range(sh.sh_offset, sh.sh_size, file_len)?,
            })
        })
        .collect();

    Ok(ParsedImage {
        format: ImageFormat::Elf,
        preferred_base,
        // end starts at preferred_base and only grows
        size: end - preferred_base,
        sections,
    })
}

fn parse_pe(pe: &PE, file_len: usize) -> Result<ParsedImage, MemoryError> {
    let image_base = pe.image_base as u64;
    let size = pe
        .header
        .optional_header
        .as_ref()
        .map(|h| u64::from(h.windows_fields.size_of_image))
        .unwrap_or(0);

    let mut sections = Vec::new();
    for s in &pe.sections {
        if s.characteristics & IMAGE_SCN_MEM_EXECUTE == 0 || s.characteristics & IMAGE_SCN_MEM_READ == 0 {
            continue;
        }
        let vaddr = span_end("section", image_base, u64::from(s.virtual_address))?;

        let len = s.size_of_raw_data.min(s.virtual_size);
        let Some(range) = file_range(u64::from(s.pointer_to_raw_data), u64::from(len), file_len) else {
            continue;
        };

        let mut flags = SegmentFlags::READ | SegmentFlags::EXECUTE;
        if s.characteristics & IMAGE_SCN_MEM_WRITE != 0 {
            flags |= SegmentFlags::WRITE;
        }
        sections.push(SectionInfo {
            name: s.name().unwrap_or("").to_string(),
            vaddr,
            flags,
            file_range: range,
        });
    }

    Ok(ParsedImage {
        format: ImageFormat::Pe,
        preferred_base: image_base,
        size,
        sections,
    })
}

fn parse_macho(macho: &MachO, file_len: usize) -> Result<ParsedImage, MemoryError> {
    let mut preferred_base = None;
    let mut end = 0u64;
    let mut sections = Vec::new();

    for segment in macho.segments.iter() {
        let segname = std::str::from_utf8(&segment.segname)
            .unwrap_or("")
            .trim_end_matches('\0');

        if segment.initprot == 0 {
            // __PAGEZERO and friends
            continue;
        }
        if segname == "__TEXT" {
            preferred_base = Some(segment.vmaddr);
        }
        end = end.max(span_end(segname, segment.vmaddr, segment.vmsize)?);

        let code = VM_PROT_READ | VM_PROT_EXECUTE;
        if segment.initprot & code != code {
            continue;
        }

        let mut flags = SegmentFlags::READ | SegmentFlags::EXECUTE;
        if segment.initprot & VM_PROT_WRITE != 0 {
            flags |= SegmentFlags::WRITE;
        }

        let segment_sections = segment
            .sections()
            .map_err(|e| MemoryError::BinaryParse(format!("Failed to read sections of {}: {}", segname, e)))?;

        for (section, _) in segment_sections {
            if section.flags & SECTION_TYPE == S_ZEROFILL {
                continue;
            }
            let Some(range) = file_range(u64::from(section.offset), section.size, file_len) else {
                continue;
            };
            sections.push(SectionInfo {
                name: section.name().unwrap_or("").to_string(),
                vaddr: section.addr,
                flags,
                file_range: range,
            });
        }
    }

    let preferred_base = preferred_base.unwrap_or(0);
    Ok(ParsedImage {
        format: ImageFormat::MachO,
        preferred_base,
        size: end.saturating_sub(preferred_base),
        sections,
    })
}
