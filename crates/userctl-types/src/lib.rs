mod args;
mod user;

pub use args::*;
pub use user::*;
