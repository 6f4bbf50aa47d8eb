// Domain layer: models and ports. No knowledge of HTTP or the file system.

pub mod model;
pub mod ports;
