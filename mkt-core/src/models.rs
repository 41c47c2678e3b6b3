mod curve;

pub use curve::*;
