pub mod command;
pub mod dispatcher;

pub use crate::domain::model::{Request, Response, ResponseBody};
pub use crate::domain::ports::StorageClient;
pub use crate::utils::error::Result;
