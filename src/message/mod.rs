//! MT message handling: block and tag extraction, field decoding and reply rendering.
mod block;
mod fields;
mod render;
mod request;
mod tag;

#[cfg(test)]
pub(crate) mod fixtures;

pub use block::*;
pub use fields::*;
pub use render::*;
pub use request::*;
pub use tag::*;
