//! Helper functions shared by the renderers, feeds and commands

mod date;
mod html;

pub use date::*;
pub use html::*;
