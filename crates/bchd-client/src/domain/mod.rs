//! # Domain Module
//!
//! Core types of the client: entities, identifiers, errors and the mapper
//! from wire messages into them.

pub mod entities;
pub mod errors;
pub mod mapper;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
