// Domain layer: request/response models and the storage port.

pub mod model;
pub mod ports;
