pub mod asset;
pub mod catalog;
pub mod constants;
pub mod contact;
pub mod error;
pub mod headless;
pub mod manifest;
pub mod showcase;
pub mod slide;
pub mod timer;
#[cfg(feature = "window")]
pub mod window;

pub use error::{Result, ShowcaseError};
pub use showcase::{Showcase, ShowcaseEvent, ShowcaseState, Timing};
pub use slide::{DisplayLayout, Slide};
