// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe tracks.
//!
//! - [`Track`] interpolates values with arithmetic (floats, vectors, camera frames)
//! - [`DiscreteTrack`] holds values without arithmetic (text) and always steps
//!
//! Both keep a [`Timeline`] and a value array of the same length, index aligned.
//! The result of the last evaluation is cached until the next mutation.

use crate::error::AnimationError;
use crate::keyframe::{Blend, InterpolationMode, Keyframe, SplineBasis, DEFAULT_TENSION};
use crate::timeline::Timeline;
use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Times, values and the cached evaluation shared by both track kinds
#[derive(Debug, Clone)]
struct KeyframeSeries<T> {
    timeline: Timeline,
    values: Vec<T>,
    last_value: Option<T>,
}

impl<T: Clone> KeyframeSeries<T> {
    fn new() -> Self {
        Self {
            timeline: Timeline::new(),
            values: Vec::new(),
            last_value: None,
        }
    }

    fn insert(&mut self, time: f32, value: T) -> usize {
        self.last_value = None;
        match self.timeline.locate(time) {
            Ok(index) => {
                self.values[index] = value;
                index
            }
            Err(index) => {
                self.timeline.insert_at(index, time);
                self.values.insert(index, value);
                index
            }
        }
    }

    fn delete(&mut self, index: usize) {
        self.timeline.delete_keyframe(index);
        self.values.remove(index);
        self.last_value = None;
    }

    fn value(&self, index: usize) -> &T {
        assert!(
            index < self.values.len(),
            "keyframe index {index} out of range (len {})",
            self.values.len()
        );
        &self.values[index]
    }

    fn set_value(&mut self, index: usize, value: T) {
        assert!(
            index < self.values.len(),
            "keyframe index {index} out of range (len {})",
            self.values.len()
        );
        self.values[index] = value;
        self.last_value = None;
    }

    fn move_to(&mut self, index: usize, time: f32) -> usize {
        let value = self.value(index).clone();
        self.delete(index);
        self.insert(time, value)
    }

    fn clear(&mut self) {
        self.timeline.clear();
        self.values.clear();
        self.last_value = None;
    }

    fn keyframes(&self) -> impl Iterator<Item = (f32, &T)> + '_ {
        self.timeline.times().iter().copied().zip(self.values.iter())
    }

    fn to_keyframes(&self) -> Vec<Keyframe<&T>> {
        self.keyframes()
            .map(|(time, value)| Keyframe::new(time, value))
            .collect()
    }

    fn from_keyframes(keyframes: Vec<Keyframe<T>>) -> Result<Self, AnimationError> {
        let mut series = Self::new();
        for keyframe in keyframes {
            if series.timeline.locate(keyframe.time).is_ok() {
                return Err(AnimationError::DuplicateKeyframe(keyframe.time));
            }
            series.insert(keyframe.time, keyframe.value);
        }
        Ok(series)
    }
}

/// Track of interpolated keyframes
#[derive(Debug, Clone)]
pub struct Track<T> {
    series: KeyframeSeries<T>,
    interpolation: InterpolationMode,
    tension: f32,
    basis: SplineBasis,
}

impl<T: Blend> Track<T> {
    /// Create an empty spline track
    pub fn new() -> Self {
        Self::with_interpolation(InterpolationMode::default())
    }

    /// Create an empty track with the given interpolation mode
    pub fn with_interpolation(interpolation: InterpolationMode) -> Self {
        Self {
            series: KeyframeSeries::new(),
            interpolation,
            tension: DEFAULT_TENSION,
            basis: SplineBasis::new(DEFAULT_TENSION),
        }
    }

    /// Get the interpolation mode
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Set the interpolation mode
    pub fn set_interpolation(&mut self, mode: InterpolationMode) {
        self.interpolation = mode;
        self.series.last_value = None;
    }

    /// Get the spline tension
    pub fn tension(&self) -> f32 {
        self.tension
    }

    /// Set the spline tension, clamped to [0, 1]
    pub fn set_tension(&mut self, tension: f32) {
        self.tension = tension.clamp(0.0, 1.0);
        self.basis = SplineBasis::new(self.tension);
        self.series.last_value = None;
    }

    /// The keyframe times
    pub fn timeline(&self) -> &Timeline {
        &self.series.timeline
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.series.values.len()
    }

    /// Whether the track has no keyframes
    pub fn is_empty(&self) -> bool {
        self.series.values.is_empty()
    }

    /// Time of the keyframe at `index`
    pub fn keyframe_time(&self, index: usize) -> f32 {
        self.series.timeline.time(index)
    }

    /// Value of the keyframe at `index`
    pub fn keyframe_value(&self, index: usize) -> &T {
        self.series.value(index)
    }

    /// Replace the value of the keyframe at `index`
    pub fn set_keyframe_value(&mut self, index: usize, value: T) {
        self.series.set_value(index, value);
    }

    /// Insert a keyframe, or update the value of the keyframe already at `time`.
    ///
    /// Returns the keyframe index.
    ///
    /// # Panics
    ///
    /// Panics if `time` is NaN.
    pub fn insert_keyframe(&mut self, time: f32, value: T) -> usize {
        self.series.insert(time, value)
    }

    /// Remove the keyframe at `index`
    pub fn delete_keyframe(&mut self, index: usize) {
        self.series.delete(index);
    }

    /// Move the keyframe at `index` to a new time, returning its new index.
    ///
    /// If another keyframe already sits at `time` the moved value replaces it.
    pub fn move_keyframe(&mut self, index: usize, time: f32) -> usize {
        self.series.move_to(index, time)
    }

    /// Remove all keyframes
    pub fn clear_keyframes(&mut self) {
        self.series.clear();
    }

    /// Time of the first keyframe
    pub fn start_offset(&self) -> f32 {
        self.series.timeline.start_offset()
    }

    /// Time between the first and the last keyframe
    pub fn duration(&self) -> f32 {
        self.series.timeline.duration()
    }

    /// All keyframes as `(time, value)` in time order
    pub fn keyframes(&self) -> impl Iterator<Item = (f32, &T)> + '_ {
        self.series.keyframes()
    }

    /// Evaluate the track at `time` and cache the result.
    ///
    /// Returns false if the track has no keyframes.
    pub fn evaluate_at(&mut self, time: f32) -> bool {
        self.series.last_value = None;
        let Some((prev, next)) = self.series.timeline.find_keyframes(time) else {
            return false;
        };

        let t_prev = self.series.timeline.time(prev);
        let t_next = self.series.timeline.time(next);
        let w = if t_next > t_prev {
            (time - t_prev) / (t_next - t_prev)
        } else {
            1.0
        };

        let values = &self.series.values;
        let value = match self.interpolation {
            InterpolationMode::Step => values[prev].clone(),
            InterpolationMode::Linear => T::blend([(w, &values[next]), (1.0 - w, &values[prev])]),
            InterpolationMode::Spline => {
                // Boundary keyframes are duplicated, not extrapolated
                let prev2 = prev.saturating_sub(1);
                let next2 = (next + 1).min(values.len() - 1);
                let [c0, c1, c2, c3] = self.basis.weights(w);
                T::blend([
                    (c0, &values[prev2]),
                    (c1, &values[prev]),
                    (c2, &values[next]),
                    (c3, &values[next2]),
                ])
            }
        };

        self.series.last_value = Some(value);
        true
    }

    /// Result of the last evaluation, `None` if it is stale or there was none
    pub fn last_interpolated_value(&self) -> Option<&T> {
        self.series.last_value.as_ref()
    }
}

impl<T: Blend + DeserializeOwned> Track<T> {
    /// Replace the content of this track with a JSON document.
    ///
    /// The track is cleared first; on error it stays empty.
    pub fn load_json(&mut self, json: &str) -> Result<(), AnimationError> {
        self.clear_keyframes();
        *self = serde_json::from_str(json)?;
        Ok(())
    }
}

impl<T: Blend> Default for Track<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Blend + Serialize> Serialize for Track<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Track", 3)?;
        state.serialize_field("interpolation", &self.interpolation)?;
        state.serialize_field("tension", &self.tension)?;
        state.serialize_field("keyframes", &self.series.to_keyframes())?;
        state.end()
    }
}

/// Persisted form of a [`Track`]
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TrackDocument<T> {
    #[serde(default)]
    interpolation: InterpolationMode,
    #[serde(default = "default_tension")]
    tension: f32,
    keyframes: Vec<Keyframe<T>>,
}

fn default_tension() -> f32 {
    DEFAULT_TENSION
}

impl<T: Blend> TryFrom<TrackDocument<T>> for Track<T> {
    type Error = AnimationError;

    fn try_from(document: TrackDocument<T>) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&document.tension) {
            return Err(AnimationError::InvalidTension(document.tension));
        }
        Ok(Self {
            series: KeyframeSeries::from_keyframes(document.keyframes)?,
            interpolation: document.interpolation,
            tension: document.tension,
            basis: SplineBasis::new(document.tension),
        })
    }
}

impl<'de, T: Blend + Deserialize<'de>> Deserialize<'de> for Track<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = TrackDocument::<T>::deserialize(deserializer)?;
        Self::try_from(document).map_err(serde::de::Error::custom)
    }
}

/// Track of values that can not be interpolated.
///
/// Evaluation returns the last keyframe at or before the given time, or the
/// first keyframe when the time lies before all of them.
#[derive(Debug, Clone)]
pub struct DiscreteTrack<T> {
    series: KeyframeSeries<T>,
}

impl<T: Clone> DiscreteTrack<T> {
    /// Create an empty track
    pub fn new() -> Self {
        Self {
            series: KeyframeSeries::new(),
        }
    }

    /// The keyframe times
    pub fn timeline(&self) -> &Timeline {
        &self.series.timeline
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.series.values.len()
    }

    /// Whether the track has no keyframes
    pub fn is_empty(&self) -> bool {
        self.series.values.is_empty()
    }

    /// Time of the keyframe at `index`
    pub fn keyframe_time(&self, index: usize) -> f32 {
        self.series.timeline.time(index)
    }

    /// Value of the keyframe at `index`
    pub fn keyframe_value(&self, index: usize) -> &T {
        self.series.value(index)
    }

    /// Replace the value of the keyframe at `index`
    pub fn set_keyframe_value(&mut self, index: usize, value: T) {
        self.series.set_value(index, value);
    }

    /// Insert a keyframe, or update the value of the keyframe already at `time`.
    ///
    /// # Panics
    ///
    /// Panics if `time` is NaN.
    pub fn insert_keyframe(&mut self, time: f32, value: T) -> usize {
        self.series.insert(time, value)
    }

    /// Remove the keyframe at `index`
    pub fn delete_keyframe(&mut self, index: usize) {
        self.series.delete(index);
    }

    /// Move the keyframe at `index` to a new time, returning its new index
    pub fn move_keyframe(&mut self, index: usize, time: f32) -> usize {
        self.series.move_to(index, time)
    }

    /// Remove all keyframes
    pub fn clear_keyframes(&mut self) {
        self.series.clear();
    }

    /// All keyframes as `(time, value)` in time order
    pub fn keyframes(&self) -> impl Iterator<Item = (f32, &T)> + '_ {
        self.series.keyframes()
    }

    /// Evaluate the track at `time` and cache the result
    pub fn evaluate_at(&mut self, time: f32) -> bool {
        self.series.last_value = None;
        let Some((prev, _)) = self.series.timeline.find_keyframes(time) else {
            return false;
        };
        self.series.last_value = Some(self.series.values[prev].clone());
        true
    }

    /// Result of the last evaluation, `None` if it is stale or there was none
    pub fn last_interpolated_value(&self) -> Option<&T> {
        self.series.last_value.as_ref()
    }
}

impl<T: Clone + DeserializeOwned> DiscreteTrack<T> {
    /// Replace the content of this track with a JSON document.
    ///
    /// The track is cleared first; on error it stays empty.
    pub fn load_json(&mut self, json: &str) -> Result<(), AnimationError> {
        self.clear_keyframes();
        *self = serde_json::from_str(json)?;
        Ok(())
    }
}

impl<T: Clone> Default for DiscreteTrack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Serialize> Serialize for DiscreteTrack<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DiscreteTrack", 1)?;
        state.serialize_field("keyframes", &self.series.to_keyframes())?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DiscreteTrackDocument<T> {
    keyframes: Vec<Keyframe<T>>,
}

impl<'de, T: Clone + Deserialize<'de>> Deserialize<'de> for DiscreteTrack<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = DiscreteTrackDocument::<T>::deserialize(deserializer)?;
        let series =
            KeyframeSeries::from_keyframes(document.keyframes).map_err(serde::de::Error::custom)?;
        Ok(Self { series })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const EPSILON: f32 = 1e-5;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn float_track(mode: InterpolationMode, keys: &[(f32, f32)]) -> Track<f32> {
        let mut track = Track::with_interpolation(mode);
        for &(time, value) in keys {
            track.insert_keyframe(time, value);
        }
        track
    }

    fn sample(track: &mut Track<f32>, time: f32) -> f32 {
        assert!(track.evaluate_at(time));
        *track.last_interpolated_value().unwrap()
    }

    #[test]
    fn test_empty_track_does_not_evaluate() {
        let mut track = Track::<f32>::new();
        assert!(!track.evaluate_at(1.0));
        assert!(track.last_interpolated_value().is_none());
    }

    #[test]
    fn test_linear_midpoint() {
        let mut track = float_track(InterpolationMode::Linear, &[(0.0, 0.0), (10.0, 10.0)]);
        assert_eq!(sample(&mut track, 5.0), 5.0);
        assert!(approx(sample(&mut track, 2.5), 2.5));
    }

    #[test]
    fn test_step_holds_previous_value() {
        let mut track =
            float_track(InterpolationMode::Step, &[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        assert_eq!(sample(&mut track, 0.0), 1.0);
        assert_eq!(sample(&mut track, 0.99), 1.0);
        assert_eq!(sample(&mut track, 1.0), 2.0);
        assert_eq!(sample(&mut track, 1.5), 2.0);
        assert_eq!(sample(&mut track, 5.0), 3.0);
    }

    #[test]
    fn test_boundary_clamp() {
        for mode in [InterpolationMode::Linear, InterpolationMode::Spline] {
            let mut track = float_track(mode, &[(1.0, 3.0), (2.0, 7.0), (4.0, -2.0)]);
            assert_eq!(sample(&mut track, -5.0), 3.0, "{mode:?}");
            assert_eq!(sample(&mut track, 1.0), 3.0, "{mode:?}");
            assert_eq!(sample(&mut track, 4.0), -2.0, "{mode:?}");
            assert_eq!(sample(&mut track, 100.0), -2.0, "{mode:?}");
        }
    }

    #[test]
    fn test_single_keyframe() {
        for mode in [
            InterpolationMode::Step,
            InterpolationMode::Linear,
            InterpolationMode::Spline,
        ] {
            let mut track = float_track(mode, &[(2.0, 4.5)]);
            assert_eq!(sample(&mut track, 0.0), 4.5);
            assert_eq!(sample(&mut track, 2.0), 4.5);
            assert_eq!(sample(&mut track, 9.0), 4.5);
        }
    }

    #[test]
    fn test_spline_passes_through_keyframes() {
        let keys = [(0.0, 1.0), (0.7, -3.0), (1.5, 2.5), (3.0, 8.0), (3.2, 0.0)];
        let mut track = float_track(InterpolationMode::Spline, &keys);
        for tension in [0.0, 0.5, 1.0] {
            track.set_tension(tension);
            for &(time, value) in &keys {
                assert_eq!(sample(&mut track, time), value, "tension {tension} at {time}");
            }
        }
    }

    #[test]
    fn test_spline_is_smooth_between_keyframes() {
        // Points on a line stay on the line with canonical tension
        let mut track = float_track(
            InterpolationMode::Spline,
            &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)],
        );
        assert!(approx(sample(&mut track, 1.5), 1.5));
        assert!(approx(sample(&mut track, 1.25), 1.25));
    }

    #[test]
    fn test_spline_overshoots_like_catmull_rom() {
        let mut track = float_track(
            InterpolationMode::Spline,
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 1.0), (3.0, 1.0)],
        );
        // (-1 * 0 + 9 * 0 + 9 * 1 - 1 * 1) / 16
        assert!(approx(sample(&mut track, 1.5), 0.5));
        // At the left boundary prev2 duplicates prev
        let value = sample(&mut track, 0.5);
        assert!(approx(value, 0.0 * 0.5625 + 0.0 * -0.0625 + 0.0 * 0.5625 + 1.0 * -0.0625));
    }

    #[test]
    fn test_vector_track() {
        let mut track = Track::with_interpolation(InterpolationMode::Linear);
        track.insert_keyframe(0.0, Vec3::ZERO);
        track.insert_keyframe(2.0, Vec3::new(2.0, 4.0, -6.0));
        assert!(track.evaluate_at(1.0));
        let value = *track.last_interpolated_value().unwrap();
        assert!((value - Vec3::new(1.0, 2.0, -3.0)).length() < EPSILON);
    }

    #[test]
    fn test_bool_track_linear_snaps() {
        let mut track = Track::with_interpolation(InterpolationMode::Linear);
        track.insert_keyframe(0.0, false);
        track.insert_keyframe(1.0, true);
        assert!(track.evaluate_at(0.25));
        assert_eq!(track.last_interpolated_value(), Some(&false));
        assert!(track.evaluate_at(0.75));
        assert_eq!(track.last_interpolated_value(), Some(&true));
    }

    #[test]
    fn test_cache_invalidation() {
        let mut track = float_track(InterpolationMode::Linear, &[(0.0, 0.0), (1.0, 1.0)]);

        let mutations: Vec<Box<dyn Fn(&mut Track<f32>)>> = vec![
            Box::new(|t: &mut Track<f32>| {
                t.insert_keyframe(0.5, 3.0);
            }),
            Box::new(|t: &mut Track<f32>| t.delete_keyframe(0)),
            Box::new(|t: &mut Track<f32>| t.set_keyframe_value(0, 9.0)),
            Box::new(|t: &mut Track<f32>| {
                t.move_keyframe(0, 0.25);
            }),
            Box::new(|t: &mut Track<f32>| t.set_interpolation(InterpolationMode::Step)),
            Box::new(|t: &mut Track<f32>| t.set_tension(0.3)),
        ];

        for mutate in mutations {
            assert!(track.evaluate_at(0.5));
            assert!(track.last_interpolated_value().is_some());
            mutate(&mut track);
            assert!(track.last_interpolated_value().is_none());
        }
    }

    #[test]
    fn test_insert_existing_time_updates_value() {
        let mut track = float_track(InterpolationMode::Linear, &[(0.0, 1.0), (1.0, 2.0)]);
        let index = track.insert_keyframe(1.0, 5.0);
        assert_eq!(index, 1);
        assert_eq!(track.keyframe_count(), 2);
        assert_eq!(*track.keyframe_value(1), 5.0);
    }

    #[test]
    fn test_move_keyframe_keeps_order() {
        let mut track =
            float_track(InterpolationMode::Linear, &[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        let index = track.move_keyframe(0, 1.5);
        assert_eq!(index, 1);
        assert_eq!(track.timeline().times(), &[1.0, 1.5, 2.0]);
        assert_eq!(*track.keyframe_value(1), 1.0);

        // Moving onto an existing time merges
        let index = track.move_keyframe(0, 2.0);
        assert_eq!(index, 1);
        assert_eq!(track.keyframe_count(), 2);
        assert_eq!(*track.keyframe_value(1), 2.0);
    }

    #[test]
    fn test_set_tension_clamps() {
        let mut track = Track::<f32>::new();
        track.set_tension(3.0);
        assert_eq!(track.tension(), 1.0);
        track.set_tension(-1.0);
        assert_eq!(track.tension(), 0.0);
    }

    #[test]
    fn test_json_round_trip() {
        for mode in [
            InterpolationMode::Step,
            InterpolationMode::Linear,
            InterpolationMode::Spline,
        ] {
            let mut track = float_track(mode, &[(0.1, 1.5), (0.7, -2.25), (3.0, 1e-3)]);
            track.set_tension(0.35);

            let json = serde_json::to_string(&track).unwrap();
            let loaded: Track<f32> = serde_json::from_str(&json).unwrap();

            assert_eq!(loaded.interpolation(), mode);
            assert_eq!(loaded.tension(), 0.35);
            assert_eq!(
                loaded.keyframes().collect::<Vec<_>>(),
                track.keyframes().collect::<Vec<_>>()
            );
        }

        let empty = Track::<Vec3>::new();
        let loaded: Track<Vec3> =
            serde_json::from_str(&serde_json::to_string(&empty).unwrap()).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_json_layout() {
        let track = float_track(InterpolationMode::Linear, &[(1.0, 2.0)]);
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "interpolation": 1,
                "tension": 0.5,
                "keyframes": [{ "time": 1.0, "value": 2.0 }],
            })
        );
    }

    #[test]
    fn test_json_member_order_and_defaults() {
        let json = r#"{ "keyframes": [ { "value": 3.0, "time": 2.0 }, { "time": 1.0, "value": 1.0 } ] }"#;
        let track: Track<f32> = serde_json::from_str(json).unwrap();
        assert_eq!(track.interpolation(), InterpolationMode::Spline);
        assert_eq!(track.tension(), DEFAULT_TENSION);
        assert_eq!(track.timeline().times(), &[1.0, 2.0]);
        assert_eq!(*track.keyframe_value(1), 3.0);
    }

    #[test]
    fn test_json_rejects_malformed_tracks() {
        let cases = [
            r#"[]"#,
            r#"{ "interpolation": 1 }"#,
            r#"{ "keyframes": [], "speed": 2 }"#,
            r#"{ "interpolation": 7, "keyframes": [] }"#,
            r#"{ "interpolation": 1, "keyframes": {} }"#,
            r#"{ "tension": "high", "keyframes": [] }"#,
            r#"{ "tension": 1.5, "keyframes": [] }"#,
            r#"{ "keyframes": [ { "time": 1.0 } ] }"#,
            r#"{ "keyframes": [ { "value": 1.0 } ] }"#,
            r#"{ "keyframes": [ { "time": 1.0, "value": 1.0, "ease": 0 } ] }"#,
            r#"{ "keyframes": [ { "time": 1.0, "value": true } ] }"#,
            r#"{ "keyframes": [ { "time": 1.0, "value": 1.0 }, { "time": 1.0, "value": 2.0 } ] }"#,
        ];
        for json in cases {
            assert!(serde_json::from_str::<Track<f32>>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn test_load_json_leaves_track_empty_on_error() {
        let mut track = float_track(InterpolationMode::Linear, &[(0.0, 1.0), (1.0, 2.0)]);
        let result = track.load_json(r#"{ "keyframes": [ { "time": 0.0, "value": "x" } ] }"#);
        assert!(result.is_err());
        assert!(track.is_empty());

        track
            .load_json(r#"{ "interpolation": 0, "keyframes": [ { "time": 4.0, "value": 8.0 } ] }"#)
            .unwrap();
        assert_eq!(track.keyframe_count(), 1);
        assert_eq!(track.interpolation(), InterpolationMode::Step);
    }

    #[test]
    fn test_bool_values_stay_bool_in_json() {
        let mut track = Track::with_interpolation(InterpolationMode::Step);
        track.insert_keyframe(0.0, true);
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["keyframes"][0]["value"], serde_json::json!(true));

        let loaded: Track<bool> = serde_json::from_value(json).unwrap();
        assert!(*loaded.keyframe_value(0));
        assert!(serde_json::from_str::<Track<bool>>(
            r#"{ "keyframes": [ { "time": 0.0, "value": 1.0 } ] }"#
        )
        .is_err());
    }

    #[test]
    fn test_discrete_track_steps() {
        let mut track = DiscreteTrack::new();
        track.insert_keyframe(2.0, "second".to_string());
        track.insert_keyframe(1.0, "first".to_string());

        assert!(track.evaluate_at(0.0));
        assert_eq!(track.last_interpolated_value().unwrap(), "first");
        assert!(track.evaluate_at(1.9));
        assert_eq!(track.last_interpolated_value().unwrap(), "first");
        assert!(track.evaluate_at(2.0));
        assert_eq!(track.last_interpolated_value().unwrap(), "second");

        track.delete_keyframe(0);
        assert!(track.last_interpolated_value().is_none());
    }

    #[test]
    fn test_discrete_track_json() {
        let mut track = DiscreteTrack::new();
        track.insert_keyframe(0.5, "hello".to_string());
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "keyframes": [{ "time": 0.5, "value": "hello" }] })
        );

        let loaded: DiscreteTrack<String> = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.keyframe_value(0), "hello");

        // Discrete tracks carry no interpolation settings
        let with_mode = r#"{ "interpolation": 0, "keyframes": [] }"#;
        assert!(serde_json::from_str::<DiscreteTrack<String>>(with_mode).is_err());
    }
}
