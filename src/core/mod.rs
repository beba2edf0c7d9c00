//! Core error handling shared by every stage of the recognition engine.

pub mod errors;

pub use errors::{OmrError, OmrResult};
