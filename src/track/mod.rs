//! Track tile maps
//!
//! Provides the drivability predicate the planner searches against.

mod line;
mod map;

pub use line::{LineCells, line_of_sight};
pub use map::{Layer, ParsedTrack, TrackError, TrackMap};
