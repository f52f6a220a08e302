//! Physical memory access through `/dev/mem`.

use crate::config::Config;
use crate::mems::error::MapError;
use crate::mems::mapper::{PageMapping, PhysicalMemory};
use std::fs::OpenOptions;
use std::io;
use std::mem::ManuallyDrop;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use std::ptr::NonNull;

/// Maps pages of a physical memory pseudo-file, one at a time.
#[derive(Debug)]
pub struct DevMem {
    device: PathBuf,
    sync: bool,
    page_size: u32,
}

impl DevMem {
    pub fn new(config: &Config) -> Result<Self, MapError> {
        // SAFETY: sysconf has no preconditions.
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page_size <= 0 {
            return Err(MapError::PageSize(io::Error::last_os_error()));
        }
        let page_size = u32::try_from(page_size)
            .map_err(|_| MapError::PageSize(io::ErrorKind::InvalidData.into()))?;
        log::debug!("System page size: {page_size}");

        Ok(Self {
            device: config.device.clone(),
            sync: config.sync,
            page_size,
        })
    }
}

impl PhysicalMemory for DevMem {
    type Mapping = DevMemPage;

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn map_page(&mut self, page: u32) -> Result<DevMemPage, MapError> {
        let mut options = OpenOptions::new();
        options.read(true).write(true);
        if self.sync {
            options.custom_flags(libc::O_SYNC);
        }
        let file = options
            .open(&self.device)
            .map_err(|e| MapError::device_open(&self.device, e))?;

        let offset = libc::off_t::try_from(page)
            .map_err(|_| MapError::map_failed(page, io::ErrorKind::InvalidInput.into()))?;
        let len = self.page_size as usize;

        // SAFETY: fresh shared mapping chosen by the kernel; the fd is valid
        // for the duration of the call.
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                offset,
            )
        };
        // The mapping outlives the descriptor.
        drop(file);

        if ptr == libc::MAP_FAILED {
            return Err(MapError::map_failed(page, io::Error::last_os_error()));
        }
        let ptr = NonNull::new(ptr.cast::<u32>())
            .ok_or_else(|| MapError::map_failed(page, io::ErrorKind::Other.into()))?;

        Ok(DevMemPage {
            ptr,
            words: len / 4,
        })
    }

    fn unmap_page(&mut self, page: u32, mapping: DevMemPage) -> Result<(), MapError> {
        mapping
            .unmap()
            .map_err(|e| MapError::unmap_failed(page, e))
    }
}

/// One page of `/dev/mem` mapped read/write. Unmapped on drop.
#[derive(Debug)]
pub struct DevMemPage {
    ptr: NonNull<u32>,
    words: usize,
}

impl DevMemPage {
    fn len(&self) -> usize {
        self.words * 4
    }

    /// Unmap now and report failure, instead of the silent unmap on drop.
    pub fn unmap(self) -> io::Result<()> {
        let this = ManuallyDrop::new(self);
        // SAFETY: ptr/len describe a live mapping created by map_page, and
        // ManuallyDrop keeps Drop from unmapping it a second time.
        let rc = unsafe { libc::munmap(this.ptr.as_ptr().cast(), this.len()) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

impl PageMapping for DevMemPage {
    fn words(&self) -> usize {
        self.words
    }

    fn read_word(&self, index: usize) -> u32 {
        assert!(index < self.words, "word {index} outside page");
        // SAFETY: index is within the mapped page and the page is word aligned.
        unsafe { self.ptr.as_ptr().add(index).read_volatile() }
    }

    fn write_word(&mut self, index: usize, value: u32) {
        assert!(index < self.words, "word {index} outside page");
        // SAFETY: as in read_word.
        unsafe { self.ptr.as_ptr().add(index).write_volatile(value) }
    }
}

impl Drop for DevMemPage {
    fn drop(&mut self) {
        // SAFETY: the mapping is still live; nothing can observe it afterwards.
        let rc = unsafe { libc::munmap(self.ptr.as_ptr().cast(), self.len()) };
        if rc != 0 {
            log::warn!("munmap failed: {}", io::Error::last_os_error());
        }
    }
}
