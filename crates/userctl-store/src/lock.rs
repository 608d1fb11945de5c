use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Advisory exclusive lock on `<store>.lock`, released on drop.
pub struct StoreLock {
    _file: File,
}

impl StoreLock {
    pub fn acquire_exclusive(store_path: &Path) -> Result<Self, StoreError> {
        let lock_path = lock_path_for(store_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(StoreError::io("create lock file", &lock_path))?;
        flock_exclusive(&file).map_err(StoreError::io("lock", &lock_path))?;
        Ok(StoreLock { _file: file })
    }
}

pub(crate) fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut name = OsString::from(store_path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

#[cfg(unix)]
fn flock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> std::io::Result<()> {
    Ok(())
}
