// Domain layer: width bookkeeping for a single check. No I/O here.

pub mod model;
