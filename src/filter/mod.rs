//! Filter token decoding, filter classification and sequence ordering.

pub mod sequence;
pub mod spec;
pub mod token;

pub use sequence::compare_sequences;
pub use spec::{FilterGroup, FilterSpec};
pub use token::{decode, encode, DecodeError};
