//! Adapters bridging external collaborators into pipeline stages

mod compile_adapter;

pub use compile_adapter::{create_transform, CompileTransform};
