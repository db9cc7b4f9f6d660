mod input;
mod keymap;
mod options;
mod runtime;
mod status;
mod terminal;
mod tripdeck;

pub use options::UiOptions;
pub use status::{StatusLine, StatusTone};
pub use tripdeck::Tripdeck;
