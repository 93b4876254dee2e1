//! Console variable values and the typed variable handle.
//!
//! Every registered command carries one value out of a closed set of kinds
//! (`f32`, `i32`, `bool`, `String`). [`VarValue`] stores it type-erased and
//! [`ConVar<T>`] is the statically typed view handed out by the registry.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::sync::Arc;

use super::{ConCommand, ConsoleError, ConsoleSink};

/// The runtime kind of a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Float,
    Int,
    Bool,
    Text,
}

impl VarKind {
    /// Display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            VarKind::Float => "float",
            VarKind::Int => "int",
            VarKind::Bool => "bool",
            VarKind::Text => "string",
        }
    }
}

impl Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type-erased variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Text(String),
}

impl VarValue {
    /// The kind of this value.
    pub fn kind(&self) -> VarKind {
        match self {
            VarValue::Float(_) => VarKind::Float,
            VarValue::Int(_) => VarKind::Int,
            VarValue::Bool(_) => VarKind::Bool,
            VarValue::Text(_) => VarKind::Text,
        }
    }

    /// Parse text as a value of the given kind.
    ///
    /// Booleans accept `true/false`, `1/0`, `yes/no` and `on/off`. Floats
    /// reject `NaN`.
    pub fn parse(kind: VarKind, s: &str) -> Option<Self> {
        match kind {
            VarKind::Float => s
                .parse::<f32>()
                .ok()
                .filter(|v| !v.is_nan())
                .map(VarValue::Float),
            VarKind::Int => s.parse().ok().map(VarValue::Int),
            VarKind::Bool => match s.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(VarValue::Bool(true)),
                "false" | "0" | "no" | "off" => Some(VarValue::Bool(false)),
                _ => None,
            },
            VarKind::Text => Some(VarValue::Text(s.to_string())),
        }
    }
}

/// Values of the same kind are ordered; different kinds are not comparable.
impl PartialOrd for VarValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (VarValue::Float(a), VarValue::Float(b)) => a.partial_cmp(b),
            (VarValue::Int(a), VarValue::Int(b)) => a.partial_cmp(b),
            (VarValue::Bool(a), VarValue::Bool(b)) => a.partial_cmp(b),
            (VarValue::Text(a), VarValue::Text(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Avoid unnecessary decimal places
            VarValue::Float(v) if v.fract() == 0.0 => write!(f, "{:.0}", v),
            VarValue::Float(v) => write!(f, "{}", v),
            VarValue::Int(v) => write!(f, "{}", v),
            VarValue::Bool(v) => write!(f, "{}", v),
            VarValue::Text(v) => f.write_str(v),
        }
    }
}

/// Trait for Rust types that can back a console variable.
///
/// Implemented for `f32`, `i32`, `bool` and `String`. `Default` is the zero
/// value returned by the registry's `get_value_*` helpers.
pub trait ConVarValue: Clone + PartialEq + Default + Send + Sync + 'static {
    /// The kind this type maps to.
    const KIND: VarKind;

    /// Wrap into the type-erased form.
    fn into_value(self) -> VarValue;

    /// Unwrap from the type-erased form, `None` on a kind mismatch.
    fn from_value(value: &VarValue) -> Option<Self>;
}

/// Variable types with an ordering, the only ones that accept bounds.
pub trait BoundedValue: ConVarValue + PartialOrd {}

impl ConVarValue for f32 {
    const KIND: VarKind = VarKind::Float;

    fn into_value(self) -> VarValue {
        VarValue::Float(self)
    }

    fn from_value(value: &VarValue) -> Option<Self> {
        match value {
            VarValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl BoundedValue for f32 {}

impl ConVarValue for i32 {
    const KIND: VarKind = VarKind::Int;

    fn into_value(self) -> VarValue {
        VarValue::Int(self)
    }

    fn from_value(value: &VarValue) -> Option<Self> {
        match value {
            VarValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl BoundedValue for i32 {}

impl ConVarValue for bool {
    const KIND: VarKind = VarKind::Bool;

    fn into_value(self) -> VarValue {
        VarValue::Bool(self)
    }

    fn from_value(value: &VarValue) -> Option<Self> {
        match value {
            VarValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl ConVarValue for String {
    const KIND: VarKind = VarKind::Text;

    fn into_value(self) -> VarValue {
        VarValue::Text(self)
    }

    fn from_value(value: &VarValue) -> Option<Self> {
        match value {
            VarValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Mutable part of a command: its value and bounds.
#[derive(Debug, Clone)]
pub(crate) struct VarState {
    pub(crate) value: VarValue,
    pub(crate) default: VarValue,
    pub(crate) min: Option<VarValue>,
    pub(crate) max: Option<VarValue>,
}

impl VarState {
    pub(crate) fn new(default: VarValue) -> Self {
        Self {
            value: default.clone(),
            default,
            min: None,
            max: None,
        }
    }

    /// Check `value` against the bounds, returning the expected range text
    /// when it falls outside.
    ///
    /// `NaN` is outside any bound.
    pub(crate) fn out_of_range(&self, value: &VarValue) -> Option<String> {
        let bounded = self.min.is_some() || self.max.is_some();
        let nan = matches!(value, VarValue::Float(v) if v.is_nan());
        let below = self.min.as_ref().is_some_and(|min| value < min);
        let above = self.max.as_ref().is_some_and(|max| value > max);

        if !below && !above && !(bounded && nan) {
            return None;
        }

        Some(match (&self.min, &self.max) {
            (Some(min), Some(max)) => format!("between {} - {}", min, max),
            (Some(min), None) => format!("at least {}", min),
            (None, Some(max)) => format!("at most {}", max),
            (None, None) => String::new(),
        })
    }
}

/// A typed handle to a registered console variable.
///
/// The handle shares the registry's command, so every clone, every alias and
/// the registry itself observe the same value.
///
/// # Examples
///
/// ```
/// use bevy_convar_console::core::{ConsoleRegistry, ConsoleBuffer};
///
/// let mut registry = ConsoleRegistry::new();
/// let fov = registry
///     .register_int_var("cl_fov", 90, "Field of view", |_, _, _| true, &[], true)
///     .unwrap();
/// fov.set_min_value(60);
/// fov.set_max_value(120);
///
/// let mut console = ConsoleBuffer::default();
/// assert!(fov.set_value(150, Some(&mut console)).is_err());
/// assert_eq!(fov.get_value(), 90);
///
/// // Headless assignment skips the range check
/// fov.set_value(150, None).unwrap();
/// assert_eq!(fov.get_value(), 150);
/// ```
pub struct ConVar<T> {
    command: Arc<ConCommand>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ConVar<T> {
    fn clone(&self) -> Self {
        Self {
            command: Arc::clone(&self.command),
            _marker: PhantomData,
        }
    }
}

impl<T: ConVarValue> ConVar<T> {
    /// Wrap a command, `None` when it holds a value of another kind.
    pub fn from_command(command: Arc<ConCommand>) -> Option<Self> {
        (command.kind() == T::KIND).then_some(Self {
            command,
            _marker: PhantomData,
        })
    }

    /// The underlying command.
    #[inline]
    pub fn command(&self) -> &Arc<ConCommand> {
        &self.command
    }

    /// The registered name.
    #[inline]
    pub fn name(&self) -> &str {
        self.command.name()
    }

    /// The current value.
    pub fn get_value(&self) -> T {
        T::from_value(&self.command.value()).unwrap_or_default()
    }

    /// The value the variable was created with.
    pub fn get_default_value(&self) -> T {
        T::from_value(&self.command.default_value()).unwrap_or_default()
    }

    /// Assign a new value. See [`ConCommand::set_value`].
    pub fn set_value(
        &self,
        value: T,
        console: Option<&mut dyn ConsoleSink>,
    ) -> Result<bool, ConsoleError> {
        self.command.set_value(value.into_value(), console)
    }

    /// Go back to the default value.
    pub fn reset(&self, console: Option<&mut dyn ConsoleSink>) -> Result<bool, ConsoleError> {
        self.command.reset(console)
    }
}

impl<T: BoundedValue> ConVar<T> {
    #[inline]
    pub fn has_min_value(&self) -> bool {
        self.command.state().min.is_some()
    }

    pub fn get_min_value(&self) -> Option<T> {
        self.command.state().min.as_ref().and_then(T::from_value)
    }

    #[inline]
    pub fn has_max_value(&self) -> bool {
        self.command.state().max.is_some()
    }

    pub fn get_max_value(&self) -> Option<T> {
        self.command.state().max.as_ref().and_then(T::from_value)
    }

    /// Set the lower bound. The current value is left alone.
    pub fn set_min_value(&self, min: T) {
        self.command.state_mut().min = Some(min.into_value());
    }

    /// Set the upper bound. The current value is left alone.
    pub fn set_max_value(&self, max: T) {
        self.command.state_mut().max = Some(max.into_value());
    }
}

impl<T> fmt::Debug for ConVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConVar")
            .field("name", &self.command.name())
            .field("value", &self.command.value())
            .finish()
    }
}
