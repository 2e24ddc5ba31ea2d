//! Raw detection data produced by detection sources.
//!
//! A detection source emits one [`RawBatch`] per acquisition tick. The batch
//! is tagged with the [`SourceIndex`] assigned at registration and lives only
//! for the duration of one hub dispatch.

mod model;

pub use model::{BlobHint, RawBatch, RawDetection, SourceIndex};
