#![forbid(unsafe_code)]

mod index;
mod integrity;

pub use index::*;
pub use integrity::*;
