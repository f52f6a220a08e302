use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of the register mapper. None of these is recoverable; the run
/// stops at the first one.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("failed to query the system page size: {0}")]
    PageSize(#[source] io::Error),

    #[error("failed to open {}: {source}", path.display())]
    DeviceOpenFailed { path: PathBuf, source: io::Error },

    #[error("failed to mmap register memory at page 0x{page:08x}: {source}")]
    MapFailed { page: u32, source: io::Error },

    #[error("failed to unmap register memory at page 0x{page:08x}: {source}")]
    UnmapFailed { page: u32, source: io::Error },

    #[error("address 0x{address:08x} is outside the mapped page 0x{page:08x}")]
    OutsidePage { address: u32, page: u32 },
}

impl MapError {
    pub fn device_open(path: &Path, source: io::Error) -> Self {
        Self::DeviceOpenFailed {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn map_failed(page: u32, source: io::Error) -> Self {
        Self::MapFailed { page, source }
    }

    pub fn unmap_failed(page: u32, source: io::Error) -> Self {
        Self::UnmapFailed { page, source }
    }

    pub fn outside_page(address: u32, page: u32) -> Self {
        Self::OutsidePage { address, page }
    }
}
