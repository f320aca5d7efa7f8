//! File records
//!
//! Each file belongs to exactly one user and is addressed either by its internal
//! id or by the composite [`FileId`](crate::ids::FileId). The payload lives in
//! the backend next to the metadata.

pub mod errors;
pub mod store;
pub mod types;

pub use errors::FileError;
pub use store::FileStore;
pub use types::{Download, FileMeta, StoredFile, Upload};
