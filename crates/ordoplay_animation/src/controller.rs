// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation controller: playback and keyframe capture for a scene animation.
//!
//! The controller owns the attached [`SceneAnimation`] while it drives it and
//! pushes evaluated values into the camera and into bound engine variables.
//! The host calls [`AnimationController::update`] once per frame.
//!
//! Targets are listed in binding order. Target 0 is always the camera; the
//! active target is the one keyframes are captured from and jumped between.

use crate::binding::{Binding, BoundVariable};
use crate::camera::{CameraFrame, CameraSink};
use crate::registry::{SceneAnimation, TrackRef};
use crate::settings::PlaybackSettings;
use crate::timeline::Timeline;
use glam::Vec3;
use std::cell::Cell;
use std::rc::Rc;

/// Drives a [`SceneAnimation`] and applies it to the engine
pub struct AnimationController {
    settings: PlaybackSettings,
    animation: Option<SceneAnimation>,
    camera: Option<Box<dyn CameraSink>>,
    playing: bool,
    dirty: bool,
    bindings: Vec<Binding>,
    active: usize,
    subtitle: Option<String>,
}

impl AnimationController {
    /// Create a controller with default settings and nothing attached
    pub fn new() -> Self {
        Self::with_settings(PlaybackSettings::default())
    }

    /// Create a controller with the given settings
    pub fn with_settings(settings: PlaybackSettings) -> Self {
        Self {
            settings,
            animation: None,
            camera: None,
            playing: false,
            dirty: false,
            bindings: vec![Binding::camera()],
            active: 0,
            subtitle: None,
        }
    }

    /// Get the playback settings
    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    /// Get the mutable playback settings
    pub fn settings_mut(&mut self) -> &mut PlaybackSettings {
        &mut self.settings
    }

    /// Attach a scene animation, returning the one attached before.
    ///
    /// Existing bindings are resolved by name against the new animation, creating
    /// tracks where needed. Bindings whose name is taken by a track of another
    /// kind are dropped. Playback stops at the span start.
    pub fn set_scene_animation(&mut self, animation: SceneAnimation) -> Option<SceneAnimation> {
        let previous = self.animation.replace(animation);
        self.resolve_bindings();
        tracing::debug!("Attached scene animation with {} bindings", self.bindings.len());
        self.stop();
        previous
    }

    /// Detach the scene animation
    pub fn take_scene_animation(&mut self) -> Option<SceneAnimation> {
        self.playing = false;
        self.dirty = true;
        self.subtitle = None;
        self.animation.take()
    }

    /// Get the attached scene animation
    pub fn scene_animation(&self) -> Option<&SceneAnimation> {
        self.animation.as_ref()
    }

    /// Get the mutable attached scene animation
    pub fn scene_animation_mut(&mut self) -> Option<&mut SceneAnimation> {
        self.animation.as_mut()
    }

    /// Set the camera that receives the animated pose
    pub fn set_target_camera(&mut self, camera: Option<Box<dyn CameraSink>>) {
        self.camera = camera;
        self.dirty = true;
    }

    /// Get the target camera
    pub fn target_camera(&self) -> Option<&dyn CameraSink> {
        self.camera.as_deref()
    }

    /// Bind an engine variable to the track `name`, creating the track if needed.
    ///
    /// Binding a name again replaces the variable of the existing binding. The
    /// camera target is never replaced, even by a variable named like it.
    /// Returns false if no animation is attached or `name` belongs to a track of
    /// another kind.
    pub fn bind(&mut self, name: &str, variable: BoundVariable) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            tracing::warn!("Cannot bind '{}': no scene animation attached", name);
            return false;
        };
        let Some(var) = animation.find_or_create(name, variable.kind()) else {
            tracing::warn!(
                "Cannot bind '{}' as {}: name is used by another kind",
                name,
                variable.kind().name()
            );
            return false;
        };

        let track = TrackRef::Var(var);
        match self
            .bindings
            .iter_mut()
            .find(|b| b.variable.is_some() && b.name == name)
        {
            Some(binding) => {
                binding.track = track;
                binding.variable = Some(variable);
            }
            None => self.bindings.push(Binding {
                name: name.to_string(),
                track,
                variable: Some(variable),
            }),
        }
        true
    }

    /// Bind a shared float variable
    pub fn bind_float(&mut self, name: &str, variable: Rc<Cell<f32>>) -> bool {
        self.bind(name, BoundVariable::float(variable))
    }

    /// Bind a shared vector variable
    pub fn bind_vector3(&mut self, name: &str, variable: Rc<Cell<Vec3>>) -> bool {
        self.bind(name, BoundVariable::vector3(variable))
    }

    /// Bind a shared boolean variable
    pub fn bind_bool(&mut self, name: &str, variable: Rc<Cell<bool>>) -> bool {
        self.bind(name, BoundVariable::bool(variable))
    }

    fn resolve_bindings(&mut self) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        self.bindings.retain_mut(|binding| {
            let Some(variable) = &binding.variable else {
                return true;
            };
            match animation.find_or_create(&binding.name, variable.kind()) {
                Some(var) => {
                    binding.track = TrackRef::Var(var);
                    true
                }
                None => {
                    tracing::warn!(
                        "Dropping binding '{}': name is used by another kind",
                        binding.name
                    );
                    false
                }
            }
        });
        if self.active >= self.bindings.len() {
            self.active = 0;
        }
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Toggle play/pause
    pub fn toggle_playing(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Play from current position
    pub fn play(&mut self) {
        if !self.playing {
            self.dirty = true;
        }
        self.playing = true;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.playing {
            self.dirty = true;
        }
        self.playing = false;
    }

    /// Stop and reset to the span start
    pub fn stop(&mut self) {
        self.dirty = true;
        if let Some(animation) = self.animation.as_mut() {
            let (start, _) = animation.time_span();
            animation.set_time(start);
        }
        self.apply();
        self.playing = false;
    }

    /// Whether applied values changed since the flag was last cleared
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set or clear the dirty flag
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Current time of the attached animation
    pub fn current_time(&self) -> Option<f32> {
        self.animation.as_ref().map(SceneAnimation::time)
    }

    /// Time span of the attached animation
    pub fn time_span(&self) -> Option<(f32, f32)> {
        self.animation.as_ref().map(SceneAnimation::time_span)
    }

    /// Subtitle at the current time
    pub fn current_subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Advance playback by `elapsed` seconds and apply the result.
    ///
    /// At the span end playback wraps to the start, or stops when looping is off.
    pub fn update(&mut self, elapsed: f32) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        if !self.playing {
            return;
        }

        let (start, end) = animation.time_span();
        let mut time = animation.time() + elapsed * self.settings.speed;
        if self.settings.looping {
            if end > start {
                while time > end && time.is_finite() {
                    time = start + (time - end);
                }
            }
        } else if time >= end {
            time = end;
            self.playing = false;
        }

        animation.set_time(time);
        self.apply();
    }

    /// Move to `time` without changing the play state
    pub fn seek(&mut self, time: f32) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        animation.set_time(time);
        self.apply();
    }

    /// Number of animation targets (the camera plus bound variables)
    pub fn target_count(&self) -> usize {
        self.bindings.len()
    }

    /// Name of the target at `index`
    pub fn target_name(&self, index: usize) -> Option<&str> {
        self.bindings.get(index).map(|b| b.name.as_str())
    }

    /// Select the target to capture keyframes from. Returns false if out of range.
    pub fn set_active_target(&mut self, index: usize) -> bool {
        if index >= self.bindings.len() {
            return false;
        }
        self.active = index;
        true
    }

    /// Index of the active target
    pub fn active_target(&self) -> usize {
        self.active
    }

    /// Keyframe times of the active target's track
    pub fn active_timeline(&self) -> Option<&Timeline> {
        let animation = self.animation.as_ref()?;
        animation.timeline(self.bindings.get(self.active)?.track)
    }

    /// Capture the active target's current value as a keyframe at the current time.
    ///
    /// Returns false if nothing could be captured.
    pub fn insert_keyframe_at_current_time(&mut self) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            tracing::warn!("Cannot insert keyframe: no scene animation attached");
            return false;
        };
        let Some(binding) = self.bindings.get(self.active) else {
            return false;
        };
        let time = animation.time();

        let inserted = match (&binding.track, &binding.variable) {
            (TrackRef::Camera, _) => match self.camera.as_deref() {
                Some(camera) => {
                    let frame = CameraFrame::capture(camera);
                    Some(animation.camera_animation_mut().insert_keyframe(time, frame))
                }
                None => {
                    tracing::warn!("Cannot insert camera keyframe: no target camera");
                    None
                }
            },
            (TrackRef::Var(var), Some(variable)) => {
                animation.insert_keyframe(*var, time, variable.value())
            }
            _ => None,
        };

        let Some(index) = inserted else {
            return false;
        };
        tracing::debug!("Inserted keyframe {} on '{}' at {}", index, binding.name, time);
        // Edits drop the cached evaluation
        animation.set_time(time);
        self.apply();
        true
    }

    /// Delete the active target's last keyframe at or before the current time
    pub fn delete_keyframe_at_current_time(&mut self) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        let Some(binding) = self.bindings.get(self.active) else {
            return false;
        };

        let index = animation
            .timeline(binding.track)
            .and_then(|timeline| timeline.last_keyframe(animation.time()));
        let deleted = index.is_some_and(|index| animation.delete_keyframe(binding.track, index));
        if deleted {
            tracing::debug!("Deleted keyframe on '{}'", binding.name);
            animation.set_time(animation.time());
        }

        self.apply();
        deleted
    }

    /// Jump to the active target's next keyframe and pause there
    pub fn jump_to_next_keyframe(&mut self) -> bool {
        let key_time = self.active_keyframe_time(|timeline, time| timeline.next_keyframe(time), 0.0);
        self.jump_to(key_time)
    }

    /// Jump to the active target's previous keyframe and pause there
    pub fn jump_to_previous_keyframe(&mut self) -> bool {
        let epsilon = self.settings.keyframe_epsilon;
        let key_time =
            self.active_keyframe_time(|timeline, time| timeline.last_keyframe(time), -epsilon);
        self.jump_to(key_time)
    }

    fn active_keyframe_time(
        &self,
        find: impl Fn(&Timeline, f32) -> Option<usize>,
        offset: f32,
    ) -> Option<f32> {
        let timeline = self.active_timeline()?;
        let time = self.animation.as_ref()?.time() + offset;
        find(timeline, time).map(|index| timeline.time(index))
    }

    fn jump_to(&mut self, key_time: Option<f32>) -> bool {
        let (Some(key_time), Some(animation)) = (key_time, self.animation.as_mut()) else {
            return false;
        };
        animation.set_time(key_time);
        self.apply();
        self.playing = false;
        self.dirty = true;
        tracing::debug!("Jumped to keyframe at {}", key_time);
        true
    }

    /// Push the evaluated tracks into the camera, the bound variables and the subtitle
    fn apply(&mut self) {
        let Some(animation) = self.animation.as_ref() else {
            return;
        };
        self.dirty = true;

        if let Some(camera) = self.camera.as_mut() {
            if let Some(frame) = animation.camera_animation().last_interpolated_value() {
                camera.set_position(frame.position);
                camera.set_look_direction(frame.forward, frame.up);
            }
        }

        for binding in &mut self.bindings {
            let (TrackRef::Var(var), Some(variable)) = (binding.track, binding.variable.as_mut())
            else {
                continue;
            };
            if let Some(value) = animation.interpolated_value(var) {
                variable.apply(value);
            }
        }

        self.subtitle = animation
            .subtitle_animation()
            .last_interpolated_value()
            .cloned();
    }
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new()
    }
}
