// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time-only backbone of a keyframe track.
//!
//! A [`Timeline`] stores keyframe times in ascending order without duplicates.
//! Callers only get read access to the times, so the ordering can not be broken
//! from the outside. All lookups are binary searches.

/// Sorted list of keyframe times (seconds)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    times: Vec<f32>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keyframes
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the timeline has no keyframes
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the keyframe at `index`
    ///
    /// Panics if `index` is out of range.
    pub fn time(&self, index: usize) -> f32 {
        assert!(
            index < self.times.len(),
            "keyframe index {index} out of range (len {})",
            self.times.len()
        );
        self.times[index]
    }

    /// All keyframe times in ascending order
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    /// Insert a keyframe time, keeping the order.
    ///
    /// Returns the index of the keyframe. If a keyframe already exists at exactly
    /// `time`, its index is returned and nothing is inserted.
    ///
    /// # Panics
    ///
    /// Panics if `time` is NaN.
    pub fn insert_keyframe(&mut self, time: f32) -> usize {
        match self.locate(time) {
            Ok(index) => index,
            Err(index) => {
                self.insert_at(index, time);
                index
            }
        }
    }

    /// Remove the keyframe at `index`
    ///
    /// Panics if `index` is out of range.
    pub fn delete_keyframe(&mut self, index: usize) {
        assert!(
            index < self.times.len(),
            "keyframe index {index} out of range (len {})",
            self.times.len()
        );
        self.times.remove(index);
    }

    /// Index of the last keyframe with `keyframe time <= time`
    ///
    /// `None` if the timeline is empty or `time` lies before the first keyframe.
    pub fn last_keyframe(&self, time: f32) -> Option<usize> {
        self.times.partition_point(|&t| t <= time).checked_sub(1)
    }

    /// Index of the first keyframe with `keyframe time > time`
    ///
    /// `None` if the timeline is empty or `time` is at or after the last keyframe.
    pub fn next_keyframe(&self, time: f32) -> Option<usize> {
        let index = self.times.partition_point(|&t| t <= time);
        (index < self.times.len()).then_some(index)
    }

    /// Keyframes surrounding `time` as `(prev, next)`.
    ///
    /// A missing side is clamped to the other one, so evaluating before the first
    /// or after the last keyframe lands on the boundary keyframe.
    pub fn find_keyframes(&self, time: f32) -> Option<(usize, usize)> {
        match (self.last_keyframe(time), self.next_keyframe(time)) {
            (Some(prev), Some(next)) => Some((prev, next)),
            (Some(prev), None) => Some((prev, prev)),
            (None, Some(next)) => Some((next, next)),
            (None, None) => None,
        }
    }

    /// Time of the first keyframe, or 0 if empty
    pub fn start_offset(&self) -> f32 {
        self.times.first().copied().unwrap_or(0.0)
    }

    /// Time between the first and the last keyframe, or 0 with fewer than two keyframes
    pub fn duration(&self) -> f32 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) if self.times.len() >= 2 => last - first,
            _ => 0.0,
        }
    }

    /// `Ok(index)` if a keyframe sits exactly at `time`, otherwise `Err(index)` with
    /// the position where it would be inserted.
    pub(crate) fn locate(&self, time: f32) -> Result<usize, usize> {
        assert!(!time.is_nan(), "keyframe time must not be NaN");
        match self.last_keyframe(time) {
            Some(index) if self.times[index] == time => Ok(index),
            Some(index) => Err(index + 1),
            None => Err(0),
        }
    }

    pub(crate) fn insert_at(&mut self, index: usize, time: f32) {
        self.times.insert(index, time);
    }

    pub(crate) fn clear(&mut self) {
        self.times.clear();
    }
}
