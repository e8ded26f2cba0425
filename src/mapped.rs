use std::{fs::OpenOptions, os::fd::AsRawFd, path::Path, ptr, slice};

use crate::error::{Error, Result};

/// A private, copy-on-write mapping of a whole file.
///
/// Writes through [`MappedFile::as_mut_slice`] stay in this process and never
/// reach the file.
pub struct MappedFile {
    length: usize,
    mem_base: *mut libc::c_void,
}

impl MappedFile {
    pub fn open(file_path: &Path) -> Result<Self> {
        let io_err = |op, source| Error::Io {
            path: file_path.to_path_buf(),
            op,
            source,
        };
        let file = OpenOptions::new()
            .read(true)
            .open(file_path)
            .map_err(|err| io_err("open", err))?;
        let length = file.metadata().map_err(|err| io_err("stat", err))?.len() as usize;
        if length == 0 {
            return Ok(Self {
                length,
                mem_base: ptr::null_mut(),
            });
        }
        let mapped_mem_base = unsafe {
            libc::mmap(
                ptr::null_mut(),
                length,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE,
                file.as_raw_fd(),
                0,
            )
        };
        if mapped_mem_base == libc::MAP_FAILED {
            return Err(io_err("mmap", std::io::Error::last_os_error()));
        }
        Ok(Self {
            length,
            mem_base: mapped_mem_base,
        })
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        if self.mem_base.is_null() {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.mem_base as *const u8, self.length) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        if self.mem_base.is_null() {
            return &mut [];
        }
        unsafe { slice::from_raw_parts_mut(self.mem_base as *mut u8, self.length) }
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        if self.mem_base.is_null() {
            return;
        }
        if unsafe { libc::munmap(self.mem_base, self.length) } == -1 {
            tracing::warn!(
                "memory unmapping failed: {}",
                std::io::Error::last_os_error()
            );
        }
    }
}
