//! Synchronous building blocks shared by every Knob crate: value [`Mapper`]s, the built-in
//! [`mappers`], and entity naming.

pub mod mappers;

mod error;
mod mapper;
mod string;
pub use error::*;
pub use mapper::*;
pub use string::*;
