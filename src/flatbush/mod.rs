mod flatbush_impl;
mod hilbert;

pub use flatbush_impl::{Flatbush, FLATBUSH_DEFAULT_DEGREE};
