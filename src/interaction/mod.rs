//! Interaction layer - uniform element operations over a [`BrowserDriver`]
//!
//! [`BrowserDriver`]: crate::bridge::BrowserDriver

pub mod error;
pub mod grid;
pub mod step;
pub mod utility;
pub mod wait;

pub use error::{InteractionError, InteractionResultExt};
pub use grid::{find_column_index, grid_cell_selector, GRID_HEADER_SELECTOR};
pub use step::{step_title, StepCategory, StepInfo, StepSink, Steps};
pub use utility::{HtmlProperty, Utility, DEFAULT_KEYSTROKE_DELAY_MS};
