//! Slidemill storage library
//!
//! Storage abstraction for the slide pipeline: the [`SlideStore`] trait, an
//! S3-compatible implementation, a local-filesystem implementation for dry
//! runs and tests, and the upload-error classification used by the retry
//! controller.
//!
//! Objects are keyed by their remote filename (e.g. `Slide_007.mp4`) directly
//! under the configured bucket; there is no nested key hierarchy.

pub mod classify;
pub mod factory;
pub mod local;
pub mod s3;
pub mod traits;

pub use classify::{classify, is_transient};
pub use factory::create_store;
pub use local::LocalStore;
pub use s3::S3Store;
pub use traits::{SlideStore, StoreError, StoreResult};
