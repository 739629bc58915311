#![deny(warnings)]
pub mod error;
pub mod eval;
pub mod game;
pub mod model;

pub use error::EngineError;
