pub mod adapters;
#[cfg(feature = "cli")]
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use client::GatewayClient;
#[cfg(feature = "cli")]
pub use config::{CliCommand, CliConfig};
pub use config::LambdaConfig;

pub use adapters::MemoryStorage;
#[cfg(feature = "lambda")]
pub use adapters::S3StorageClient;

pub use core::dispatcher::Dispatcher;
pub use domain::model::{BucketDescriptor, ObjectHandle, Request, Response, ResponseBody};
pub use domain::ports::StorageClient;
pub use utils::error::{GatewayError, Result};
