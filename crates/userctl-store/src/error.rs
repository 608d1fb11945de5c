use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("-operation flag has to be specified")]
    MissingOperation,
    #[error("-fileName flag has to be specified")]
    MissingFileName,
    #[error("-item flag has to be specified")]
    MissingItem,
    #[error("-id flag has to be specified")]
    MissingId,
    #[error("Operation {0} not allowed!")]
    UnknownOperation(String),
    #[error("can't unmarshal json, error = {0}")]
    InvalidItem(#[source] serde_json::Error),
    #[error("can't decode users from {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("can't encode users: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("can't {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("can't write output: {0}")]
    Output(#[source] std::io::Error),
}

impl StoreError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io {
            action,
            path,
            source,
        }
    }
}
