//! Draw selection boxes over an image and export their coordinates.
//!
//! [`geometry`] and [`store`] hold all of the coordinate and bookkeeping logic and do
//! not depend on the UI; [`app`] is the eframe front end.

pub mod app;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod image_input;
pub mod logging;
pub mod rulers;
pub mod store;

pub use error::{PickerError, Result};
pub use geometry::{ExportScale, Geometry, ImageFrame, ScaledBox, ScreenPoint, ScreenRect, Size};
pub use store::{BoxStore, SelectionBox, StoreEvent, MAX_BOXES};
