// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bindings between engine variables and animation tracks.
//!
//! The controller never stores raw references to engine state. A bound variable
//! is a [`ValueSink`], usually an `Rc<Cell<T>>` shared with the owner of the
//! variable, so a binding can not outlive the storage it writes to.

use crate::registry::{TrackRef, VarKind, VarValue};
use glam::Vec3;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Read/write access to an engine variable
pub trait ValueSink<T> {
    /// Current value of the variable
    fn get(&self) -> T;
    /// Overwrite the variable
    fn set(&mut self, value: T);
}

impl<T: Copy> ValueSink<T> for Rc<Cell<T>> {
    fn get(&self) -> T {
        Cell::get(self)
    }

    fn set(&mut self, value: T) {
        Cell::set(self, value);
    }
}

impl<T: Clone> ValueSink<T> for Rc<RefCell<T>> {
    fn get(&self) -> T {
        self.borrow().clone()
    }

    fn set(&mut self, value: T) {
        *self.borrow_mut() = value;
    }
}

/// Engine variable driven by a named track
pub enum BoundVariable {
    /// Float variable
    Float(Box<dyn ValueSink<f32>>),
    /// Vector variable
    Vector3(Box<dyn ValueSink<Vec3>>),
    /// Boolean variable
    Bool(Box<dyn ValueSink<bool>>),
}

impl BoundVariable {
    /// Bind a float variable
    pub fn float(sink: impl ValueSink<f32> + 'static) -> Self {
        Self::Float(Box::new(sink))
    }

    /// Bind a vector variable
    pub fn vector3(sink: impl ValueSink<Vec3> + 'static) -> Self {
        Self::Vector3(Box::new(sink))
    }

    /// Bind a boolean variable
    pub fn bool(sink: impl ValueSink<bool> + 'static) -> Self {
        Self::Bool(Box::new(sink))
    }

    /// Value type of the variable
    pub fn kind(&self) -> VarKind {
        match self {
            Self::Float(_) => VarKind::Float,
            Self::Vector3(_) => VarKind::Vector3,
            Self::Bool(_) => VarKind::Bool,
        }
    }

    /// Read the variable
    pub fn value(&self) -> VarValue {
        match self {
            Self::Float(sink) => VarValue::Float(sink.get()),
            Self::Vector3(sink) => VarValue::Vector3(sink.get()),
            Self::Bool(sink) => VarValue::Bool(sink.get()),
        }
    }

    /// Write the variable. Values of another type are ignored.
    pub fn apply(&mut self, value: VarValue) {
        match (self, value) {
            (Self::Float(sink), VarValue::Float(v)) => sink.set(v),
            (Self::Vector3(sink), VarValue::Vector3(v)) => sink.set(v),
            (Self::Bool(sink), VarValue::Bool(v)) => sink.set(v),
            _ => {}
        }
    }
}

impl fmt::Debug for BoundVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoundVariable").field(&self.kind()).finish()
    }
}

/// Binding of a named track to its target
#[derive(Debug)]
pub(crate) struct Binding {
    pub name: String,
    pub track: TrackRef,
    /// `None` for the camera, which the controller drives directly
    pub variable: Option<BoundVariable>,
}

impl Binding {
    pub fn camera() -> Self {
        Self {
            name: CAMERA_TARGET_NAME.to_string(),
            track: TrackRef::Camera,
            variable: None,
        }
    }
}

/// Name of the camera target, always the first one
pub const CAMERA_TARGET_NAME: &str = "Camera";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_sink() {
        let value = Rc::new(Cell::new(2.0_f32));
        let mut variable = BoundVariable::float(Rc::clone(&value));

        assert_eq!(variable.value(), VarValue::Float(2.0));
        variable.apply(VarValue::Float(7.5));
        assert_eq!(value.get(), 7.5);
    }

    #[test]
    fn test_refcell_sink() {
        let value = Rc::new(RefCell::new(Vec3::ZERO));
        let mut variable = BoundVariable::vector3(Rc::clone(&value));

        variable.apply(VarValue::Vector3(Vec3::ONE));
        assert_eq!(*value.borrow(), Vec3::ONE);
        assert_eq!(variable.kind(), VarKind::Vector3);
    }

    #[test]
    fn test_mismatched_value_is_ignored() {
        let flag = Rc::new(Cell::new(false));
        let mut variable = BoundVariable::bool(Rc::clone(&flag));

        variable.apply(VarValue::Float(1.0));
        assert!(!flag.get());
        variable.apply(VarValue::Bool(true));
        assert!(flag.get());
    }
}
