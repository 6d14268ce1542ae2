// Domain layer: course model and the storage port. No HTTP or logging concerns here.

pub mod model;
pub mod ports;
