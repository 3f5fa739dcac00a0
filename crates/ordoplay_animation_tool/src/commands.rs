// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command implementations.

use glam::Vec3;
use ordoplay_animation::{
    AnimationController, AnimationError, CameraFrame, FreeCamera, PlaybackSettings,
    SceneAnimation, VarKind, VarValue, CAMERA_TARGET_NAME,
};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

const SUBTITLES_TRACK_NAME: &str = "Subtitles";

/// Error reported by a command
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error("Invalid {kind} value: '{value}'")]
    InvalidValue { kind: &'static str, value: String },

    #[error("Track '{0}' not found")]
    UnknownTrack(String),

    #[error("Track name must not be empty")]
    EmptyName,

    #[error("Track '{name}' already exists as {existing}")]
    KindMismatch { name: String, existing: &'static str },
}

pub type Result<T> = std::result::Result<T, ToolError>;

pub fn info(file: &Path) -> Result<()> {
    let animation = SceneAnimation::load(file)?;
    let (start, end) = animation.time_span();

    println!("Time span: {start} - {end}");
    let camera = animation.camera_animation();
    println!(
        "{CAMERA_TARGET_NAME}: {} keyframes ({})",
        camera.keyframe_count(),
        camera.interpolation().name()
    );
    println!(
        "{SUBTITLES_TRACK_NAME}: {} keyframes",
        animation.subtitle_animation().keyframe_count()
    );

    for (name, var) in animation.animated_vars() {
        let summary = match var.kind {
            VarKind::Float => animation
                .float_animation(name)
                .map(|t| (t.keyframe_count(), t.interpolation())),
            VarKind::Vector3 => animation
                .vector3_animation(name)
                .map(|t| (t.keyframe_count(), t.interpolation())),
            VarKind::Bool => animation
                .bool_animation(name)
                .map(|t| (t.keyframe_count(), t.interpolation())),
        };
        let (count, mode) = summary.ok_or_else(|| ToolError::UnknownTrack(name.to_string()))?;
        println!("{name} [{}]: {count} keyframes ({})", var.kind.name(), mode.name());
    }
    Ok(())
}

pub fn sample(file: &Path, time: f32, track: Option<&str>) -> Result<()> {
    let mut animation = SceneAnimation::load(file)?;
    animation.set_time(time);
    println!("t = {}", animation.time());

    let wants = |name: &str| track.map_or(true, |t| t == name);
    let mut found = false;

    if wants(CAMERA_TARGET_NAME) {
        found = true;
        match animation.camera_animation().last_interpolated_value() {
            Some(frame) => println!("{CAMERA_TARGET_NAME}: {}", format_frame(frame)),
            None => println!("{CAMERA_TARGET_NAME}: -"),
        }
    }
    if wants(SUBTITLES_TRACK_NAME) {
        found = true;
        let subtitle = animation.subtitle_animation().last_interpolated_value();
        println!("{SUBTITLES_TRACK_NAME}: {}", subtitle.map_or("-", String::as_str));
    }
    for (name, var) in animation.animated_vars() {
        if !wants(name) {
            continue;
        }
        found = true;
        match animation.interpolated_value(var) {
            Some(value) => println!("{name}: {}", format_value(value)),
            None => println!("{name}: -"),
        }
    }

    match track {
        Some(name) if !found => Err(ToolError::UnknownTrack(name.to_string())),
        _ => Ok(()),
    }
}

pub fn new(file: &Path, start: f32, end: f32) -> Result<()> {
    if end < start {
        return Err(AnimationError::InvalidTimeSpan { start, end }.into());
    }
    SceneAnimation::with_time_span(start, end).save(file)?;
    Ok(())
}

pub fn key(file: &Path, track: &str, kind: VarKind, time: f32, value: &str) -> Result<()> {
    if track.is_empty() {
        return Err(ToolError::EmptyName);
    }
    if !time.is_finite() {
        return Err(ToolError::InvalidValue {
            kind: "time",
            value: time.to_string(),
        });
    }
    let value = parse_value(kind, value)?;

    let mut animation = SceneAnimation::load(file)?;
    let Some(var) = animation.find_or_create(track, kind) else {
        let existing = animation.descriptor(track).map_or("unknown", |v| v.kind.name());
        return Err(ToolError::KindMismatch {
            name: track.to_string(),
            existing,
        });
    };

    let index = animation
        .insert_keyframe(var, time, value)
        .ok_or_else(|| ToolError::UnknownTrack(track.to_string()))?;
    tracing::info!("Keyframe {} of '{}' set at {}", index, track, time);
    animation.save(file)?;
    Ok(())
}

pub fn play(file: &Path, settings: PlaybackSettings, dt: f32, frames: u32) -> Result<()> {
    let animation = SceneAnimation::load(file)?;
    let camera = Rc::new(RefCell::new(FreeCamera::default()));

    let mut controller = AnimationController::with_settings(settings);
    controller.set_target_camera(Some(Box::new(Rc::clone(&camera))));
    controller.set_scene_animation(animation);
    controller.play();

    for frame in 0..frames {
        controller.update(dt);
        let pose = CameraFrame::capture(&*camera.borrow());
        let time = controller.current_time().unwrap_or_default();
        let pose = format_frame(&pose);
        match controller.current_subtitle() {
            Some(subtitle) => println!("{frame:4} t={time:.3} {pose} \"{subtitle}\""),
            None => println!("{frame:4} t={time:.3} {pose}"),
        }
        if !controller.is_playing() {
            break;
        }
    }
    Ok(())
}

/// Parse a command line value of the given kind
pub fn parse_value(kind: VarKind, text: &str) -> Result<VarValue> {
    let invalid = || ToolError::InvalidValue {
        kind: kind.name(),
        value: text.to_string(),
    };

    match kind {
        VarKind::Float => text.trim().parse().map(VarValue::Float).map_err(|_| invalid()),
        VarKind::Bool => text.trim().parse().map(VarValue::Bool).map_err(|_| invalid()),
        VarKind::Vector3 => {
            let parts = text
                .split(',')
                .map(|part| part.trim().parse::<f32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| invalid())?;
            match parts.as_slice() {
                [x, y, z] => Ok(VarValue::Vector3(Vec3::new(*x, *y, *z))),
                _ => Err(invalid()),
            }
        }
    }
}

fn format_value(value: VarValue) -> String {
    match value {
        VarValue::Float(v) => format!("{v}"),
        VarValue::Vector3(v) => format_vec3(v),
        VarValue::Bool(v) => format!("{v}"),
    }
}

fn format_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

fn format_frame(frame: &CameraFrame) -> String {
    format!(
        "pos={} forward={} up={}",
        format_vec3(frame.position),
        format_vec3(frame.forward),
        format_vec3(frame.up)
    )
}
