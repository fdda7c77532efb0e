// Domain layer: the book record, its validation rules and the ports the driver talks through.

pub mod isbn;
pub mod model;
pub mod ports;
pub mod presence;
pub mod projection;
pub mod report;
