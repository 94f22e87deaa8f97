//! Full-screen region snipping: snapshot every display, let the user drag a
//! rectangle over the frozen desktop, save that region as a PNG.

pub mod capture;
pub mod cli;
pub mod dialog;
pub mod error;
pub mod export;
pub mod keys;
pub mod overlay;
pub mod renderer;
pub mod selection;
pub mod session;
pub mod single_instance;
mod windows_util;
