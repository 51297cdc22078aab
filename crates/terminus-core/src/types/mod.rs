//! Runtime value types and structured descriptors

mod descriptors;
mod value;

pub use descriptors::{Arn, Partition, UrlParts};
pub use value::{Value, ValueType};
