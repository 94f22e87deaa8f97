pub mod drawing;
pub mod font;
pub mod state;

pub use state::{OverlayAction, OverlayState};
