//! Two-layer tile map for race tracks
//!
//! A cell is drivable when its road tile is set and its collision tile is
//! empty. Maps can be built from ASCII art or loaded from RON / JSON.

use std::fs;
use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::line::line_of_sight;

/// Tile layer selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Road tiles; non-zero means paved
    Road,
    /// Collision tiles; non-zero means solid
    Collision,
}

/// A race track as two tile layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMap {
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
    road: Vec<u16>,
    collision: Vec<u16>,
}

/// A track parsed from ASCII along with its marked cells
#[derive(Debug, Clone)]
pub struct ParsedTrack {
    /// The tile map
    pub map: TrackMap,
    /// Cell marked `S`
    pub start: Option<IVec2>,
    /// Cell marked `G`
    pub goal: Option<IVec2>,
}

impl TrackMap {
    /// Create an empty track (no road anywhere)
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            road: vec![0; width * height],
            collision: vec![0; width * height],
        }
    }

    /// Create a track paved everywhere
    #[must_use]
    pub fn paved(width: usize, height: usize) -> Self {
        Self {
            road: vec![1; width * height],
            ..Self::new(width, height)
        }
    }

    /// Parse a track from ASCII rows.
    ///
    /// `.` is road, `#` is a wall, `~` and space are off-road. `S` and `G`
    /// are road cells marking the start and goal. Row 0 is the top.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are empty, ragged, or contain unknown
    /// characters
    pub fn from_ascii(source: &str) -> Result<ParsedTrack, TrackError> {
        let rows: Vec<&str> = source
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if width == 0 {
            return Err(TrackError::InvalidLayout("track has no cells".to_string()));
        }

        let mut map = Self::new(width, height);
        let mut start = None;
        let mut goal = None;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(TrackError::InvalidLayout(format!(
                    "row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }

            for (x, ch) in row.chars().enumerate() {
                let i = y * width + x;
                let cell = IVec2::new(x as i32, y as i32);
                match ch {
                    '.' => map.road[i] = 1,
                    'S' => {
                        map.road[i] = 1;
                        start = Some(cell);
                    }
                    'G' => {
                        map.road[i] = 1;
                        goal = Some(cell);
                    }
                    '#' => map.collision[i] = 1,
                    '~' | ' ' => {}
                    other => {
                        return Err(TrackError::InvalidLayout(format!(
                            "unknown tile {other:?} at ({x}, {y})"
                        )));
                    }
                }
            }
        }

        Ok(ParsedTrack { map, start, goal })
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    fn layer(&self, layer: Layer) -> &[u16] {
        match layer {
            Layer::Road => &self.road,
            Layer::Collision => &self.collision,
        }
    }

    /// Check if a cell is inside the map
    #[must_use]
    pub fn contains(&self, cell: IVec2) -> bool {
        self.index(cell).is_some()
    }

    /// Tile id at a cell (0 outside the map)
    #[must_use]
    pub fn tile(&self, layer: Layer, cell: IVec2) -> u16 {
        self.index(cell).map_or(0, |i| self.layer(layer)[i])
    }

    /// Set a tile id. Cells outside the map are ignored.
    pub fn set_tile(&mut self, layer: Layer, cell: IVec2, id: u16) {
        if let Some(i) = self.index(cell) {
            match layer {
                Layer::Road => self.road[i] = id,
                Layer::Collision => self.collision[i] = id,
            }
        }
    }

    /// Check if a car may occupy a cell
    #[must_use]
    pub fn is_drivable(&self, cell: IVec2) -> bool {
        self.index(cell)
            .is_some_and(|i| self.road[i] > 0 && self.collision[i] == 0)
    }

    /// Check if every cell on the straight line between two cells is drivable
    #[must_use]
    pub fn has_line_of_sight(&self, from: IVec2, to: IVec2) -> bool {
        line_of_sight(from, to, |c| self.is_drivable(c))
    }

    /// Number of drivable cells
    #[must_use]
    pub fn drivable_count(&self) -> usize {
        self.road
            .iter()
            .zip(&self.collision)
            .filter(|&(&r, &c)| r > 0 && c == 0)
            .count()
    }

    fn validate(self) -> Result<Self, TrackError> {
        let expected = self.width * self.height;
        if self.road.len() != expected || self.collision.len() != expected {
            return Err(TrackError::InvalidLayout(format!(
                "layers must hold {expected} tiles, got road {} / collision {}",
                self.road.len(),
                self.collision.len()
            )));
        }
        Ok(self)
    }

    /// Parse a track from a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the layers do not match
    /// the dimensions
    pub fn from_ron_str(source: &str) -> Result<Self, TrackError> {
        let map: TrackMap =
            ron::from_str(source).map_err(|e| TrackError::DeserializeError(e.to_string()))?;
        map.validate()
    }

    /// Serialize to a pretty RON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, TrackError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| TrackError::SerializeError(e.to_string()))
    }

    /// Save the track to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), TrackError> {
        let ron_string = self.to_ron_string()?;
        fs::write(path, ron_string).map_err(|e| TrackError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a track from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, TrackError> {
        let content = fs::read_to_string(path).map_err(|e| TrackError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the track to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), TrackError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| TrackError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| TrackError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a track from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TrackError> {
        let content = fs::read_to_string(path).map_err(|e| TrackError::IoError(e.to_string()))?;
        let map: TrackMap = serde_json::from_str(&content)
            .map_err(|e| TrackError::DeserializeError(e.to_string()))?;
        map.validate()
    }
}

/// Errors that can occur while building or loading a track
#[derive(Debug, Clone)]
pub enum TrackError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// Layer data that does not describe a rectangular map
    InvalidLayout(String),
}

impl std::fmt::Display for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::InvalidLayout(e) => write!(f, "Invalid track layout: {e}"),
        }
    }
}

impl std::error::Error for TrackError {}
