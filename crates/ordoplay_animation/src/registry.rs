// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene animation: all tracks of one animated scene plus the shared clock.

use crate::camera::CameraFrame;
use crate::error::{AnimationError, Result};
use crate::keyframe::InterpolationMode;
use crate::timeline::Timeline;
use crate::track::{DiscreteTrack, Track};
use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::path::Path;

/// Value type of an animated variable
///
/// Persisted as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum VarKind {
    /// `f32`
    Float = 0,
    /// `Vec3`
    Vector3 = 1,
    /// `bool`
    Bool = 2,
}

impl VarKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Float => "Float",
            Self::Vector3 => "Vector3",
            Self::Bool => "Bool",
        }
    }
}

/// Location of a named track: its kind and its slot in the track array of that kind.
///
/// Slots are never reused or compacted, so a descriptor stays valid for the
/// lifetime of the [`SceneAnimation`] that handed it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimatedVar {
    /// Value type
    pub kind: VarKind,
    /// Index into the track array for `kind`
    pub slot: usize,
}

/// Reference to any track owned by a [`SceneAnimation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackRef {
    /// The camera track
    Camera,
    /// The subtitle track
    Subtitles,
    /// A named variable track
    Var(AnimatedVar),
}

/// Value of an animated variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarValue {
    /// Float value
    Float(f32),
    /// 3D vector
    Vector3(Vec3),
    /// Boolean
    Bool(bool),
}

impl VarValue {
    /// Kind of this value
    pub fn kind(&self) -> VarKind {
        match self {
            Self::Float(_) => VarKind::Float,
            Self::Vector3(_) => VarKind::Vector3,
            Self::Bool(_) => VarKind::Bool,
        }
    }
}

/// All animation tracks of a scene and the playback clock.
///
/// Owns one camera track, one subtitle track and any number of named float,
/// vector and bool tracks. [`set_time`](Self::set_time) evaluates every track at
/// the same time.
#[derive(Debug, Clone)]
pub struct SceneAnimation {
    start_time: f32,
    end_time: f32,
    current_time: f32,
    camera: Track<CameraFrame>,
    subtitles: DiscreteTrack<String>,
    vars: IndexMap<String, AnimatedVar>,
    float_tracks: Vec<Track<f32>>,
    vector3_tracks: Vec<Track<Vec3>>,
    bool_tracks: Vec<Track<bool>>,
}

impl SceneAnimation {
    /// Create an empty animation with a zero-length span
    pub fn new() -> Self {
        Self::with_time_span(0.0, 0.0)
    }

    /// Create an empty animation covering `[start, end]`
    pub fn with_time_span(start: f32, end: f32) -> Self {
        let mut animation = Self {
            start_time: 0.0,
            end_time: 0.0,
            current_time: 0.0,
            camera: Track::new(),
            subtitles: DiscreteTrack::new(),
            vars: IndexMap::new(),
            float_tracks: Vec::new(),
            vector3_tracks: Vec::new(),
            bool_tracks: Vec::new(),
        };
        animation.set_time_span(start, end);
        animation.set_time(start);
        animation
    }

    /// Set the playback span. An `end` before `start` collapses the span to `start`.
    pub fn set_time_span(&mut self, start: f32, end: f32) {
        self.start_time = start;
        self.end_time = end.max(start);
    }

    /// Playback span as `(start, end)`
    pub fn time_span(&self) -> (f32, f32) {
        (self.start_time, self.end_time)
    }

    /// Current time
    pub fn time(&self) -> f32 {
        self.current_time
    }

    /// Set the current time, clamped into the span, and evaluate all tracks at it
    pub fn set_time(&mut self, time: f32) {
        self.current_time = if time > self.end_time {
            self.end_time
        } else if time < self.start_time {
            self.start_time
        } else {
            time
        };
        let time = self.current_time;

        self.camera.evaluate_at(time);
        self.subtitles.evaluate_at(time);
        for track in &mut self.float_tracks {
            track.evaluate_at(time);
        }
        for track in &mut self.vector3_tracks {
            track.evaluate_at(time);
        }
        for track in &mut self.bool_tracks {
            track.evaluate_at(time);
        }
    }

    /// Get the camera track
    pub fn camera_animation(&self) -> &Track<CameraFrame> {
        &self.camera
    }

    /// Get the mutable camera track
    pub fn camera_animation_mut(&mut self) -> &mut Track<CameraFrame> {
        &mut self.camera
    }

    /// Get the subtitle track
    pub fn subtitle_animation(&self) -> &DiscreteTrack<String> {
        &self.subtitles
    }

    /// Get the mutable subtitle track
    pub fn subtitle_animation_mut(&mut self) -> &mut DiscreteTrack<String> {
        &mut self.subtitles
    }

    /// Create a named track. Returns false if `name` is empty or already taken.
    ///
    /// Bool tracks start in step mode.
    pub fn create_animation(&mut self, name: &str, kind: VarKind) -> bool {
        if name.is_empty() || self.vars.contains_key(name) {
            return false;
        }

        let slot = match kind {
            VarKind::Float => push_slot(&mut self.float_tracks, Track::new()),
            VarKind::Vector3 => push_slot(&mut self.vector3_tracks, Track::new()),
            VarKind::Bool => push_slot(
                &mut self.bool_tracks,
                Track::with_interpolation(InterpolationMode::Step),
            ),
        };
        self.vars.insert(name.to_string(), AnimatedVar { kind, slot });
        tracing::debug!("Created {} animation '{}'", kind.name(), name);
        true
    }

    /// Descriptor of the track registered under `name`, created if missing.
    ///
    /// `None` if the name is taken by a track of another kind.
    pub fn find_or_create(&mut self, name: &str, kind: VarKind) -> Option<AnimatedVar> {
        self.create_animation(name, kind);
        self.descriptor(name).filter(|var| var.kind == kind)
    }

    /// Descriptor of the track registered under `name`
    pub fn descriptor(&self, name: &str) -> Option<AnimatedVar> {
        self.vars.get(name).copied()
    }

    /// Named tracks in creation order
    pub fn animated_vars(&self) -> impl Iterator<Item = (&str, AnimatedVar)> + '_ {
        self.vars.iter().map(|(name, var)| (name.as_str(), *var))
    }

    /// Number of named tracks
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether there are no named tracks
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Get a float track by name
    pub fn float_animation(&self, name: &str) -> Option<&Track<f32>> {
        let slot = self.slot_of(name, VarKind::Float)?;
        self.float_tracks.get(slot)
    }

    /// Get a mutable float track by name
    pub fn float_animation_mut(&mut self, name: &str) -> Option<&mut Track<f32>> {
        let slot = self.slot_of(name, VarKind::Float)?;
        self.float_tracks.get_mut(slot)
    }

    /// Get a vector track by name
    pub fn vector3_animation(&self, name: &str) -> Option<&Track<Vec3>> {
        let slot = self.slot_of(name, VarKind::Vector3)?;
        self.vector3_tracks.get(slot)
    }

    /// Get a mutable vector track by name
    pub fn vector3_animation_mut(&mut self, name: &str) -> Option<&mut Track<Vec3>> {
        let slot = self.slot_of(name, VarKind::Vector3)?;
        self.vector3_tracks.get_mut(slot)
    }

    /// Get a bool track by name
    pub fn bool_animation(&self, name: &str) -> Option<&Track<bool>> {
        let slot = self.slot_of(name, VarKind::Bool)?;
        self.bool_tracks.get(slot)
    }

    /// Get a mutable bool track by name
    pub fn bool_animation_mut(&mut self, name: &str) -> Option<&mut Track<bool>> {
        let slot = self.slot_of(name, VarKind::Bool)?;
        self.bool_tracks.get_mut(slot)
    }

    fn slot_of(&self, name: &str, kind: VarKind) -> Option<usize> {
        self.vars
            .get(name)
            .filter(|var| var.kind == kind)
            .map(|var| var.slot)
    }

    /// Keyframe times of any track
    pub fn timeline(&self, track: TrackRef) -> Option<&Timeline> {
        match track {
            TrackRef::Camera => Some(self.camera.timeline()),
            TrackRef::Subtitles => Some(self.subtitles.timeline()),
            TrackRef::Var(var) => match var.kind {
                VarKind::Float => self.float_tracks.get(var.slot).map(Track::timeline),
                VarKind::Vector3 => self.vector3_tracks.get(var.slot).map(Track::timeline),
                VarKind::Bool => self.bool_tracks.get(var.slot).map(Track::timeline),
            },
        }
    }

    /// Delete a keyframe of any track. Returns false if the track does not exist.
    pub fn delete_keyframe(&mut self, track: TrackRef, index: usize) -> bool {
        match track {
            TrackRef::Camera => self.camera.delete_keyframe(index),
            TrackRef::Subtitles => self.subtitles.delete_keyframe(index),
            TrackRef::Var(var) => match var.kind {
                VarKind::Float => match self.float_tracks.get_mut(var.slot) {
                    Some(track) => track.delete_keyframe(index),
                    None => return false,
                },
                VarKind::Vector3 => match self.vector3_tracks.get_mut(var.slot) {
                    Some(track) => track.delete_keyframe(index),
                    None => return false,
                },
                VarKind::Bool => match self.bool_tracks.get_mut(var.slot) {
                    Some(track) => track.delete_keyframe(index),
                    None => return false,
                },
            },
        }
        true
    }

    /// Insert a keyframe into a variable track.
    ///
    /// Returns the keyframe index, or `None` if the track does not exist or has
    /// another value type.
    ///
    /// # Panics
    ///
    /// Panics if `time` is NaN.
    pub fn insert_keyframe(&mut self, var: AnimatedVar, time: f32, value: VarValue) -> Option<usize> {
        match value {
            VarValue::Float(v) if var.kind == VarKind::Float => self
                .float_tracks
                .get_mut(var.slot)
                .map(|track| track.insert_keyframe(time, v)),
            VarValue::Vector3(v) if var.kind == VarKind::Vector3 => self
                .vector3_tracks
                .get_mut(var.slot)
                .map(|track| track.insert_keyframe(time, v)),
            VarValue::Bool(v) if var.kind == VarKind::Bool => self
                .bool_tracks
                .get_mut(var.slot)
                .map(|track| track.insert_keyframe(time, v)),
            _ => None,
        }
    }

    /// Last evaluated value of a variable track
    pub fn interpolated_value(&self, var: AnimatedVar) -> Option<VarValue> {
        match var.kind {
            VarKind::Float => self
                .float_tracks
                .get(var.slot)?
                .last_interpolated_value()
                .copied()
                .map(VarValue::Float),
            VarKind::Vector3 => self
                .vector3_tracks
                .get(var.slot)?
                .last_interpolated_value()
                .copied()
                .map(VarValue::Vector3),
            VarKind::Bool => self
                .bool_tracks
                .get(var.slot)?
                .last_interpolated_value()
                .copied()
                .map(VarValue::Bool),
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON. The current time starts at the span start.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: SceneAnimationDocument = serde_json::from_str(json)?;
        Self::try_from(document)
    }

    /// Load an animation file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AnimationError::io(path, e))?;
        let animation = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded scene animation {:?}: {} animated vars, {} camera keyframes",
            path,
            animation.len(),
            animation.camera.keyframe_count()
        );
        Ok(animation)
    }

    /// Replace this animation with the content of a file.
    ///
    /// On error the animation is left untouched.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        match Self::load(path) {
            Ok(animation) => {
                *self = animation;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load scene animation {:?}: {}", path, e);
                Err(e)
            }
        }
    }

    /// Save to an animation file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json_string()?;
        if let Err(e) = std::fs::write(path, content) {
            tracing::warn!("Unable to write scene animation {:?}: {}", path, e);
            return Err(AnimationError::io(path, e));
        }
        tracing::info!("Saved scene animation {:?}", path);
        Ok(())
    }
}

fn push_slot<T>(tracks: &mut Vec<T>, track: T) -> usize {
    tracks.push(track);
    tracks.len() - 1
}

impl Default for SceneAnimation {
    fn default() -> Self {
        Self::new()
    }
}

/// Track of an `AnimatedVars` record, typed by the record's `Type`
#[derive(Serialize)]
#[serde(untagged)]
enum VarTrackRef<'a> {
    Float(&'a Track<f32>),
    Vector3(&'a Track<Vec3>),
    Bool(&'a Track<bool>),
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AnimatedVarRecord<'a> {
    name: &'a str,
    #[serde(rename = "Type")]
    kind: VarKind,
    animation: VarTrackRef<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SceneAnimationRecord<'a> {
    start_time: f32,
    end_time: f32,
    camera_animation: &'a Track<CameraFrame>,
    subtitles: &'a DiscreteTrack<String>,
    animated_vars: Vec<AnimatedVarRecord<'a>>,
}

impl Serialize for SceneAnimation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let animated_vars = self
            .vars
            .iter()
            .map(|(name, var)| AnimatedVarRecord {
                name,
                kind: var.kind,
                animation: match var.kind {
                    VarKind::Float => VarTrackRef::Float(&self.float_tracks[var.slot]),
                    VarKind::Vector3 => VarTrackRef::Vector3(&self.vector3_tracks[var.slot]),
                    VarKind::Bool => VarTrackRef::Bool(&self.bool_tracks[var.slot]),
                },
            })
            .collect();

        SceneAnimationRecord {
            start_time: self.start_time,
            end_time: self.end_time,
            camera_animation: &self.camera,
            subtitles: &self.subtitles,
            animated_vars,
        }
        .serialize(serializer)
    }
}

/// Persisted `AnimatedVars` record. The track is parsed once `Type` is known.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct AnimatedVarDocument {
    name: String,
    #[serde(rename = "Type")]
    kind: VarKind,
    animation: serde_json::Value,
}

/// Persisted form of a [`SceneAnimation`]
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct SceneAnimationDocument {
    #[serde(default)]
    start_time: f32,
    #[serde(default)]
    end_time: f32,
    #[serde(default)]
    camera_animation: Track<CameraFrame>,
    #[serde(default)]
    subtitles: DiscreteTrack<String>,
    #[serde(default)]
    animated_vars: Vec<AnimatedVarDocument>,
}

impl TryFrom<SceneAnimationDocument> for SceneAnimation {
    type Error = AnimationError;

    fn try_from(document: SceneAnimationDocument) -> Result<Self> {
        if document.end_time < document.start_time {
            return Err(AnimationError::InvalidTimeSpan {
                start: document.start_time,
                end: document.end_time,
            });
        }

        let mut animation = Self::with_time_span(document.start_time, document.end_time);
        animation.camera = document.camera_animation;
        animation.subtitles = document.subtitles;

        for var in document.animated_vars {
            if var.name.is_empty() {
                return Err(AnimationError::MissingField("AnimatedVars.Name"));
            }
            if animation.vars.contains_key(&var.name) {
                return Err(AnimationError::DuplicateName(var.name));
            }

            let slot = match var.kind {
                VarKind::Float => {
                    push_slot(&mut animation.float_tracks, serde_json::from_value(var.animation)?)
                }
                VarKind::Vector3 => push_slot(
                    &mut animation.vector3_tracks,
                    serde_json::from_value(var.animation)?,
                ),
                VarKind::Bool => {
                    push_slot(&mut animation.bool_tracks, serde_json::from_value(var.animation)?)
                }
            };
            animation.vars.insert(var.name, AnimatedVar { kind: var.kind, slot });
        }

        animation.set_time(animation.start_time);
        Ok(animation)
    }
}

impl<'de> Deserialize<'de> for SceneAnimation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let document = SceneAnimationDocument::deserialize(deserializer)?;
        Self::try_from(document).map_err(serde::de::Error::custom)
    }
}
