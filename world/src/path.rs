//! Fixed waypoint route walked by every enemy.

use glam::Vec2;
use thiserror::Error;

/// Reasons a list of waypoints cannot form a path.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum PathError {
    /// A path needs a start and an end.
    #[error("a path needs at least two waypoints, got {count}")]
    TooFewPoints {
        /// Number of waypoints provided.
        count: usize,
    },
    /// Two consecutive waypoints coincide, forming a zero-length segment.
    #[error("waypoint {index} repeats the waypoint before it")]
    ZeroLengthSegment {
        /// Index of the repeated waypoint.
        index: usize,
    },
    /// A waypoint coordinate is not a finite number.
    #[error("waypoint {index} is not finite")]
    NonFinite {
        /// Index of the offending waypoint.
        index: usize,
    },
}

/// Ordered, immutable sequence of waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct PathModel {
    points: Vec<Vec2>,
}

impl PathModel {
    /// Validates and stores the provided waypoints.
    pub fn new(points: Vec<Vec2>) -> Result<Self, PathError> {
        if points.len() < 2 {
            return Err(PathError::TooFewPoints {
                count: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|point| !point.is_finite()) {
            return Err(PathError::NonFinite { index });
        }
        if let Some(index) = points
            .windows(2)
            .position(|pair| pair[0] == pair[1])
            .map(|index| index + 1)
        {
            return Err(PathError::ZeroLengthSegment { index });
        }
        Ok(Self { points })
    }

    /// Waypoint at the provided index, if it exists.
    #[must_use]
    pub fn point_at(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; construction rejects empty paths.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the final waypoint.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.points.len() - 1
    }

    /// Where enemies enter the arena.
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.points[0]
    }

    /// All waypoints in walking order.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Shortest distance from the provided point to any path segment.
    #[must_use]
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.points
            .windows(2)
            .map(|pair| distance_to_segment(point, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min)
    }

    /// Total walking distance from the first to the last waypoint.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let t = ((point - start).dot(segment) / segment.length_squared()).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
