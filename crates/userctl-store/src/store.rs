use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use userctl_output::format_user_list;
use userctl_types::UserList;

use crate::error::StoreError;
use crate::lock::StoreLock;

/// A JSON array of users persisted in a single file.
///
/// Every call touches the whole file: there is no partial update and no
/// in-memory caching between calls.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock(&self) -> Result<StoreLock, StoreError> {
        StoreLock::acquire_exclusive(&self.path)
    }

    /// Reads the file as-is. The file must already exist.
    pub fn read_raw(&self) -> Result<Vec<u8>, StoreError> {
        let mut file = File::open(&self.path).map_err(StoreError::io("open", &self.path))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(StoreError::io("read", &self.path))?;
        debug!("Read {} bytes from {}", bytes.len(), self.path.display());
        Ok(bytes)
    }

    /// Loads the user list, creating an empty file if none exists.
    ///
    /// Empty or whitespace-only content and a JSON `null` are an empty list.
    pub fn load(&self) -> Result<UserList, StoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(StoreError::io("open or create", &self.path))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(StoreError::io("read", &self.path))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!("{} is empty", self.path.display());
            return Ok(UserList::new());
        }

        let users: Option<UserList> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;
        let users = users.unwrap_or_default();
        debug!("Loaded {} users from {}", users.len(), self.path.display());
        Ok(users)
    }

    /// Truncates the file and writes the whole list.
    pub fn save(&self, users: &UserList) -> Result<(), StoreError> {
        let data = format_user_list(users).map_err(StoreError::Encode)?;
        let mut file = File::create(&self.path).map_err(StoreError::io("open", &self.path))?;
        self.write_data(&mut file, &data)?;
        Ok(())
    }

    /// Deletes the file, then creates it again holding the whole list.
    pub fn recreate(&self, users: &UserList) -> Result<(), StoreError> {
        let data = format_user_list(users).map_err(StoreError::Encode)?;
        std::fs::remove_file(&self.path).map_err(StoreError::io("remove", &self.path))?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(StoreError::io("open or create", &self.path))?;
        self.write_data(&mut file, &data)?;
        Ok(())
    }

    fn write_data(&self, file: &mut File, data: &[u8]) -> Result<(), StoreError> {
        file.write_all(data)
            .map_err(StoreError::io("write", &self.path))?;
        debug!("Wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}
