// Adapters layer: concrete storage backends behind `domain::ports::StorageClient`.

pub mod memory;

#[cfg(feature = "lambda")]
pub mod s3;

pub use memory::MemoryStorage;

#[cfg(feature = "lambda")]
pub use s3::S3StorageClient;
