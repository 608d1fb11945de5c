mod error;
mod lock;
mod operations;
mod store;

pub use error::*;
pub use lock::StoreLock;
pub use operations::*;
pub use store::*;
