//! Features Module - Feature Assembly Engine
//!
//! Turns raw request/form values into the positional vector a model expects.

pub mod layout;
pub mod field_map;
pub mod encoding;
pub mod onehot;
pub mod vector;
pub mod assembler;

// Re-export common types
pub use layout::{ColumnSpec, LayoutInfo, LayoutMismatchError};
pub use field_map::FieldMap;
pub use encoding::{CategoricalEncoding, CategoryVocabulary, EncodingPolicy};
pub use onehot::OneHotGroup;
pub use vector::FeatureVector;
pub use assembler::{assemble, assemble_batch, assemble_one_hot, RawInput};
