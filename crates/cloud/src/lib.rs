//! Clients for the hosted services the workflow calls out to.
//!
//! - [`storage`] -- object storage for uploaded videos (local disk, S3, memory).
//! - [`functions`] -- callable remote functions (the `chat` assistant).

pub mod error;
pub mod functions;
pub mod storage;

pub use error::CloudError;
pub use functions::{CannedChatFunction, ChatFunction, ChatFunctionConfig, HttpChatFunction};
pub use storage::{LocalObjectStorage, MemoryObjectStorage, ObjectStorage, S3ObjectStorage};
