// rust/pipeline-core/src/dataset/params.rs

//! Run-time parameters resolved when an iterator is initialized.
//!
//! A dataset description holds [`Param`]s instead of concrete values so the
//! same description can be re-run with different filenames, epoch counts or
//! batch sizes. Placeholders are filled from a [`Feed`].

use std::collections::HashMap;
use std::fmt;

use crate::error::{PipelineError, Result};

/// A parameter that is either known now or supplied at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param<T> {
    Value(T),
    Placeholder { name: String, default: Option<T> },
}

impl<T> Param<T> {
    /// A required placeholder.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::Placeholder {
            name: name.into(),
            default: None,
        }
    }

    /// A placeholder that falls back to `default` when not fed.
    pub fn placeholder_with_default(name: impl Into<String>, default: T) -> Self {
        Self::Placeholder {
            name: name.into(),
            default: Some(default),
        }
    }
}

impl<T: FromParamValue> Param<T> {
    /// Resolves this parameter against `feed`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if a placeholder without default is not fed, or is
    /// fed a value of another type or shape.
    pub(crate) fn resolve(&self, feed: &Feed) -> Result<T> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Placeholder { name, default } => match (feed.get(name), default) {
                (Some(fed), _) => T::from_param_value(fed).ok_or_else(|| {
                    PipelineError::invalid_argument(format!(
                        "parameter '{name}' expects {}, but was fed {}",
                        T::EXPECTED,
                        fed.type_name()
                    ))
                }),
                (None, Some(default)) => Ok(default.clone()),
                (None, None) => Err(PipelineError::invalid_argument(format!(
                    "no value fed for required parameter '{name}' ({})",
                    T::EXPECTED
                ))),
            },
        }
    }
}

impl<T> From<T> for Param<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Param<String> {
    fn from(value: &str) -> Self {
        Self::Value(value.to_owned())
    }
}

impl From<Vec<&str>> for Param<Vec<String>> {
    fn from(values: Vec<&str>) -> Self {
        Self::Value(values.into_iter().map(str::to_owned).collect())
    }
}

/// A value fed for a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Int64(i64),
    String(String),
    StringList(Vec<String>),
}

impl ParamValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int64(_) => "an int64 scalar",
            Self::String(_) => "a string scalar",
            Self::StringList(_) => "a string list",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::StringList(list) => write!(f, "{list:?}"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::StringList(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::StringList(values.into_iter().map(str::to_owned).collect())
    }
}

/// Conversion from a fed [`ParamValue`]. No implicit widening: a scalar
/// string is not accepted where a list is expected.
pub trait FromParamValue: Clone {
    const EXPECTED: &'static str;

    fn from_param_value(value: &ParamValue) -> Option<Self>;
}

impl FromParamValue for i64 {
    const EXPECTED: &'static str = "an int64 scalar";

    fn from_param_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int64(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromParamValue for String {
    const EXPECTED: &'static str = "a string scalar";

    fn from_param_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromParamValue for Vec<String> {
    const EXPECTED: &'static str = "a string list";

    fn from_param_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::StringList(list) => Some(list.clone()),
            _ => None,
        }
    }
}

/// Values for named placeholders, passed to `initialize`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    values: HashMap<String, ParamValue>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Feed::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }
}
