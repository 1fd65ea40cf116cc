//! Leaf persistence: the Chunk Store (local filesystem blobs) and the
//! Metadata Store (local filesystem JSON documents).

pub mod chunk_store;
pub mod metadata_store;

pub use chunk_store::ChunkStore;
pub use metadata_store::MetadataStore;
