pub mod error;
pub mod export;
pub mod handler;

pub use error::{Result, SourceError};
pub use export::ExportSource;
pub use handler::PostSource;
