//! Emitter implementations

mod file_emitter;

pub use file_emitter::FileEmitter;
