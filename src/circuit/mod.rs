//! Circuit: generated track geometry and arc-length queries
//!
//! The segment array is built once at load time and never mutated, so a
//! `Circuit` can be shared freely between readers.

pub mod generator;
pub mod loader;

use std::io::Read;
use std::path::Path;

pub use generator::{GeneratedTrack, Segment, generate};
pub use loader::{ControlPoint, LoadError, parse_control_points, read_control_points};

use crate::config::TrackGeometry;
use crate::math::Basis;
use crate::wrap_arc_position;

/// A closed-loop track
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Generated segments plus a copy of the first one at the end
    segments: Vec<Segment>,
    /// Arc length at the start of each generated segment
    starts: Vec<f32>,
    total_length: f32,
    geometry: TrackGeometry,
}

impl Circuit {
    /// Build from already-parsed control points
    pub fn from_control_points(
        points: &[ControlPoint],
        geometry: &TrackGeometry,
    ) -> Result<Self, LoadError> {
        let GeneratedTrack {
            mut segments,
            total_length,
            ..
        } = generate(points, geometry)?;

        let mut starts = Vec::with_capacity(segments.len());
        let mut acc = 0.0f32;
        for seg in &segments {
            starts.push(acc);
            acc += seg.length;
        }
        segments.push(segments[0].clone());

        log::info!(
            "Circuit generated: {} control points -> {} segments, length {:.2}",
            points.len(),
            starts.len(),
            total_length
        );

        Ok(Self {
            segments,
            starts,
            total_length,
            geometry: geometry.clone(),
        })
    }

    /// Parse track text and build the circuit
    pub fn parse(text: &str, geometry: &TrackGeometry) -> Result<Self, LoadError> {
        let points = parse_control_points(text)?;
        Self::from_control_points(&points, geometry)
    }

    pub fn from_reader<R: Read>(reader: R, geometry: &TrackGeometry) -> Result<Self, LoadError> {
        let points = read_control_points(reader)?;
        Self::from_control_points(&points, geometry)
    }

    /// Load a track description file
    pub fn load(path: impl AsRef<Path>, geometry: &TrackGeometry) -> Result<Self, LoadError> {
        let path = path.as_ref();
        log::info!("Loading track {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), geometry)
    }

    /// True once generation produced at least one segment
    pub fn is_loaded(&self) -> bool {
        !self.starts.is_empty()
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Number of generated segments (excluding the closing copy)
    pub fn segment_count(&self) -> usize {
        self.starts.len()
    }

    /// All segments, closed: `segments()[segment_count()] == segments()[0]`
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn geometry(&self) -> &TrackGeometry {
        &self.geometry
    }

    /// Lateral run of the border strips per unit of height
    pub fn border_slope(&self) -> f32 {
        self.geometry.border_slope()
    }

    /// Segment index containing `position` and the fraction [0, 1] through it
    pub fn locate(&self, position: f32) -> (usize, f32) {
        let position = wrap_arc_position(position, self.total_length);
        let index = self
            .starts
            .partition_point(|&start| start <= position)
            .saturating_sub(1);
        let length = self.segments[index].length;
        let fraction = ((position - self.starts[index]) / length).clamp(0.0, 1.0);
        (index, fraction)
    }

    /// Interpolated frame at arc-length `position` (any value; wraps)
    pub fn basis_at(&self, position: f32) -> Basis {
        let (index, fraction) = self.locate(position);
        self.segments[index]
            .basis
            .merge(&self.segments[index + 1].basis, fraction)
    }

    /// Interpolated driving width at arc-length `position`
    pub fn width_at(&self, position: f32) -> f32 {
        let (index, fraction) = self.locate(position);
        self.segments[index].width * (1.0 - fraction) + self.segments[index + 1].width * fraction
    }
}
