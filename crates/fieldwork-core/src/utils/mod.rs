//! Small building blocks shared across crates.

mod multi_value_dict;
pub mod text;

pub use multi_value_dict::MultiValueDict;
