pub mod context;
pub mod error;

pub use context::SessionContext;
pub use error::{ErrorKind, FolioError, Result};
