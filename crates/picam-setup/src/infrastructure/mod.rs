//! Infrastructure layer: file-system storage and OS collaborator adapters.

pub mod storage;
pub mod system;
