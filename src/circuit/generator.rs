//! Track generation by adaptive subdivision
//!
//! Each control point gets a tangent from the directions of its two chords.
//! Every chord longer than `seg_length` is split at a Hermite-style midpoint
//! and both halves are processed again, until each piece is short enough to
//! become a `Segment`.
//!
//! The midpoint's tangent is the raw chord direction of its parent, not a
//! symmetric average with its neighbours. On sharp turns this leaves small
//! kinks at deep levels.

use glam::Vec3;
use serde::Serialize;

use super::loader::{ControlPoint, LoadError};
use crate::config::TrackGeometry;
use crate::math::{Basis, VectorExt};

/// One generated piece of track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Cross-section at the segment start: outer-left, inner-left,
    /// inner-right, outer-right. The outer points are the top of the borders.
    pub points: [Vec3; 4],
    /// Chord length to the next segment's origin
    pub length: f32,
    /// Driving surface width
    pub width: f32,
    /// Frame at the segment start, forward along the chord
    pub basis: Basis,
}

impl Segment {
    /// Lighting normals for the three strips (left border, road, right border)
    pub fn strip_normals(&self, geometry: &TrackGeometry) -> [Vec3; 3] {
        let up = self.basis.up();
        let right = self.basis.right();
        [
            (up * geometry.border_width + right * geometry.border_height).normalize_or_zero(),
            up,
            (up * geometry.border_width - right * geometry.border_height).normalize_or_zero(),
        ]
    }
}

/// Control point with its derived tangent
#[derive(Debug, Clone, Copy)]
struct Knot {
    point: Vec3,
    normal: Vec3,
    tangent: Vec3,
}

/// Piece of work for the subdivision stack
struct Span {
    start: Knot,
    end: Knot,
    depth: u32,
}

/// Output of a generation pass
#[derive(Debug, Clone)]
pub struct GeneratedTrack {
    /// Open list; the caller closes the loop
    pub segments: Vec<Segment>,
    pub total_length: f32,
    /// Spans emitted because the depth guard stopped them
    pub depth_limited: usize,
}

/// Tangent at each point: normalized sum of the normalized incoming and
/// outgoing chord directions (closed loop)
fn knots(points: &[ControlPoint]) -> Vec<Knot> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n].point;
            let here = points[i].point;
            let next = points[(i + 1) % n].point;
            let tangent = ((here - prev).normalize_or_zero() + (next - here).normalize_or_zero())
                .normalize_or_zero();
            Knot {
                point: here,
                normal: points[i].normal,
                tangent,
            }
        })
        .collect()
}

/// Configured depth, capped so no geometry can request unbounded work
fn depth_limit(geometry: &TrackGeometry) -> u32 {
    geometry
        .max_subdivision_depth
        .min(crate::consts::SUBDIVISION_DEPTH_CEILING)
}

fn midpoint(start: &Knot, end: &Knot, diff: Vec3, len: f32) -> Knot {
    let len_4 = len / 4.0;
    Knot {
        point: ((start.point + start.tangent.with_length(len_4))
            + (end.point - end.tangent.with_length(len_4)))
            / 2.0,
        normal: (end.normal + start.normal) * 0.5,
        tangent: diff / len,
    }
}

fn make_segment(start: &Knot, diff: Vec3, len: f32, geometry: &TrackGeometry) -> Segment {
    let right = diff.cross(start.normal).normalize_or_zero();
    let half = geometry.circ_width * 0.5;
    let inner_left = start.point - right * half;
    let inner_right = start.point + right * half;
    let lift = start.normal * geometry.border_height;
    let outer_left = inner_left - right * geometry.border_width + lift;
    let outer_right = inner_right + right * geometry.border_width + lift;

    Segment {
        points: [outer_left, inner_left, inner_right, outer_right],
        length: len,
        width: geometry.circ_width,
        basis: Basis::from_direction(start.point, diff, start.normal),
    }
}

/// Subdivide the closed loop through `points` into segments
pub fn generate(points: &[ControlPoint], geometry: &TrackGeometry) -> Result<GeneratedTrack, LoadError> {
    if points.len() < crate::consts::MIN_CONTROL_POINTS {
        return Err(LoadError::TooFewPoints {
            found: points.len(),
            min: crate::consts::MIN_CONTROL_POINTS,
        });
    }

    let max_depth = depth_limit(geometry);
    let knots = knots(points);
    let mut segments = Vec::new();
    let mut total_length = 0.0f32;
    let mut depth_limited = 0usize;
    let mut skipped = 0usize;
    let mut stack: Vec<Span> = Vec::new();

    for i in 0..knots.len() {
        stack.push(Span {
            start: knots[i],
            end: knots[(i + 1) % knots.len()],
            depth: 0,
        });

        // Depth-first, first half before second half
        while let Some(Span { start, end, depth }) = stack.pop() {
            let diff = end.point - start.point;
            let len = diff.length();

            if len > geometry.seg_length && depth < max_depth {
                let middle = midpoint(&start, &end, diff, len);
                stack.push(Span {
                    start: middle,
                    end,
                    depth: depth + 1,
                });
                stack.push(Span {
                    start,
                    end: middle,
                    depth: depth + 1,
                });
                continue;
            }

            if len > geometry.seg_length {
                depth_limited += 1;
            }
            if len <= f32::EPSILON {
                // Coincident points carry no direction
                skipped += 1;
                continue;
            }

            segments.push(make_segment(&start, diff, len, geometry));
            total_length += len;
        }
    }

    if depth_limited > 0 {
        log::warn!(
            "Subdivision depth limit {} reached on {} spans",
            max_depth,
            depth_limited
        );
    }
    if skipped > 0 {
        log::debug!("Skipped {} zero-length spans", skipped);
    }
    if segments.is_empty() || total_length <= 0.0 {
        return Err(LoadError::ZeroLength);
    }

    Ok(GeneratedTrack {
        segments,
        total_length,
        depth_limited,
    })
}
