// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe animation for OrdoPlay scenes.
//!
//! This crate records and plays back scene animations:
//! - Camera animation (position, up and forward vectors)
//! - Subtitle tracks
//! - Named float, vector and boolean variables
//! - Step, linear and Catmull-Rom spline interpolation
//! - JSON persistence of whole scene animations
//!
//! ## Architecture
//!
//! The animation system is built on:
//! - [`Timeline`]: sorted keyframe times with binary-search queries
//! - [`Track`] and [`DiscreteTrack`]: keyframe values and their interpolation
//! - [`SceneAnimation`]: the registry of all tracks of a scene plus its clock
//! - [`AnimationController`]: playback and keyframe capture against live engine state

pub mod binding;
pub mod camera;
pub mod controller;
pub mod error;
pub mod keyframe;
pub mod registry;
pub mod settings;
pub mod timeline;
pub mod track;

pub use binding::{BoundVariable, ValueSink, CAMERA_TARGET_NAME};
pub use camera::{CameraFrame, CameraSink, FreeCamera};
pub use controller::AnimationController;
pub use error::{AnimationError, Result};
pub use keyframe::{Blend, InterpolationMode, Keyframe, SplineBasis, DEFAULT_TENSION};
pub use registry::{AnimatedVar, SceneAnimation, TrackRef, VarKind, VarValue};
pub use settings::{PlaybackSettings, DEFAULT_KEYFRAME_EPSILON};
pub use timeline::Timeline;
pub use track::{DiscreteTrack, Track};
