//! HTTP Handlers

mod feed;
mod root;
mod track;

pub use feed::*;
pub use root::*;
pub use track::*;
