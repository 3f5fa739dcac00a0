// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions and interpolation math.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::ops::{Add, Mul};

/// Spline tension used by new tracks (canonical Catmull-Rom)
pub const DEFAULT_TENSION: f32 = 0.5;

/// Interpolation mode between keyframes
///
/// Persisted as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum InterpolationMode {
    /// Hold the preceding keyframe's value
    Step = 0,
    /// Linear interpolation
    Linear = 1,
    /// Catmull-Rom spline through the four neighboring keyframes
    #[default]
    Spline = 2,
}

impl InterpolationMode {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Step => "Step",
            Self::Linear => "Linear",
            Self::Spline => "Spline",
        }
    }
}

/// A keyframe: one value at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Keyframe<T> {
    /// Time in seconds
    pub time: f32,
    /// Value at this keyframe
    pub value: T,
}

impl<T> Keyframe<T> {
    /// Create a new keyframe
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Values that can be interpolated by a [`Track`](crate::Track).
///
/// `blend` returns the weighted sum of the given values. Weights from the
/// interpolators always sum to one, and a term with weight 1 next to terms with
/// weight 0 must reproduce its value exactly.
pub trait Blend: Clone {
    /// Weighted sum of `terms`
    fn blend<const N: usize>(terms: [(f32, &Self); N]) -> Self;
}

/// Weighted sum for types with vector-space arithmetic
pub fn weighted_sum<T, const N: usize>(terms: [(f32, &T); N]) -> T
where
    T: Copy + Default + Add<Output = T> + Mul<f32, Output = T>,
{
    terms
        .into_iter()
        .fold(T::default(), |sum, (weight, value)| sum + *value * weight)
}

impl Blend for f32 {
    fn blend<const N: usize>(terms: [(f32, &Self); N]) -> Self {
        weighted_sum(terms)
    }
}

impl Blend for Vec3 {
    fn blend<const N: usize>(terms: [(f32, &Self); N]) -> Self {
        weighted_sum(terms)
    }
}

// Flags blend as 0/1 and snap back at the halfway point
impl Blend for bool {
    fn blend<const N: usize>(terms: [(f32, &Self); N]) -> Self {
        let sum: f32 = terms
            .into_iter()
            .map(|(weight, &value)| if value { weight } else { 0.0 })
            .sum();
        sum >= 0.5
    }
}

/// Catmull-Rom basis for a given tension.
///
/// Row `k` holds the polynomial coefficients of the weight of control point `k`
/// (`prev2`, `prev`, `next`, `next2`), applied to `[1, w, w², w³]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineBasis {
    rows: [[f32; 4]; 4],
}

impl SplineBasis {
    /// Build the basis for tension `tau`
    pub fn new(tau: f32) -> Self {
        Self {
            rows: [
                [0.0, -tau, 2.0 * tau, -tau],
                [1.0, 0.0, tau - 3.0, 2.0 - tau],
                [0.0, tau, 3.0 - 2.0 * tau, tau - 2.0],
                [0.0, 0.0, -tau, tau],
            ],
        }
    }

    /// Blending weights of the four control points at parameter `w`
    pub fn weights(&self, w: f32) -> [f32; 4] {
        let powers = [1.0, w, w * w, w * w * w];
        self.rows
            .map(|row| row.iter().zip(powers).map(|(c, p)| c * p).sum())
    }
}

impl Default for SplineBasis {
    fn default() -> Self {
        Self::new(DEFAULT_TENSION)
    }
}
