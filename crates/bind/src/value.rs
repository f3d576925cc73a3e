//! Property values carried by metadata and attribute sets, and constructor arguments.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::metadata::Metadata;
use crate::widget::WidgetRef;

/// The value of a metadata property or attribute key.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
	/// Boolean value.
	Bool(bool),
	/// Integer value. Negative integers are the "unset" sentinel.
	Int(i64),
	/// Floating point value. Negative values are the "unset" sentinel.
	Float(f64),
	/// String value. The empty string is the "unset" sentinel.
	Str(String),
	/// Integer list, e.g. bounds or insets.
	Ints(Vec<i64>),
	/// Name of a type such as a layout strategy or border kind.
	Type(String),
	/// Instances held by a repetition container.
	Nested(Vec<Metadata>),
}

impl AttrValue {
	/// Builds a [`AttrValue::Type`] from a type name.
	pub fn ty(name: impl Into<String>) -> Self {
		AttrValue::Type(name.into())
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			AttrValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			AttrValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value, widening integers.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			AttrValue::Float(v) => Some(*v),
			AttrValue::Int(v) => Some(*v as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			AttrValue::Str(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_ints(&self) -> Option<&[i64]> {
		match self {
			AttrValue::Ints(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_type(&self) -> Option<&str> {
		match self {
			AttrValue::Type(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_nested(&self) -> Option<&[Metadata]> {
		match self {
			AttrValue::Nested(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the textual payload of a string or a type name.
	pub fn as_name(&self) -> Option<&str> {
		match self {
			AttrValue::Str(v) | AttrValue::Type(v) => Some(v),
			_ => None,
		}
	}

	/// Returns true if this value is a sentinel meaning "not set".
	pub fn is_blank(&self) -> bool {
		match self {
			AttrValue::Str(v) | AttrValue::Type(v) => v.is_empty(),
			AttrValue::Int(v) => *v < 0,
			AttrValue::Float(v) => *v < 0.0,
			AttrValue::Bool(_) | AttrValue::Ints(_) | AttrValue::Nested(_) => false,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			AttrValue::Bool(_) => "bool",
			AttrValue::Int(_) => "int",
			AttrValue::Float(_) => "float",
			AttrValue::Str(_) => "string",
			AttrValue::Ints(_) => "int list",
			AttrValue::Type(_) => "type",
			AttrValue::Nested(_) => "nested",
		}
	}
}

impl From<bool> for AttrValue {
	fn from(v: bool) -> Self {
		AttrValue::Bool(v)
	}
}

impl From<i64> for AttrValue {
	fn from(v: i64) -> Self {
		AttrValue::Int(v)
	}
}

impl From<i32> for AttrValue {
	fn from(v: i32) -> Self {
		AttrValue::Int(i64::from(v))
	}
}

impl From<f64> for AttrValue {
	fn from(v: f64) -> Self {
		AttrValue::Float(v)
	}
}

impl From<String> for AttrValue {
	fn from(v: String) -> Self {
		AttrValue::Str(v)
	}
}

impl From<&str> for AttrValue {
	fn from(v: &str) -> Self {
		AttrValue::Str(v.to_string())
	}
}

impl From<Vec<i64>> for AttrValue {
	fn from(v: Vec<i64>) -> Self {
		AttrValue::Ints(v)
	}
}

impl<const N: usize> From<[i64; N]> for AttrValue {
	fn from(v: [i64; N]) -> Self {
		AttrValue::Ints(v.to_vec())
	}
}

impl From<Vec<Metadata>> for AttrValue {
	fn from(v: Vec<Metadata>) -> Self {
		AttrValue::Nested(v)
	}
}

// Seal the FromAttrValue trait to prevent external implementations.
mod sealed {
	pub trait Sealed {}
	impl Sealed for bool {}
	impl Sealed for i64 {}
	impl Sealed for f64 {}
	impl Sealed for String {}
	impl Sealed for Vec<i64> {}
	impl Sealed for super::TypeName {}
}

/// Name of a type read out of an [`AttrValue::Type`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName(pub String);

/// Types that can be extracted from an [`AttrValue`].
pub trait FromAttrValue: sealed::Sealed + Sized {
	/// Extracts the value, returning `None` if the type doesn't match.
	fn from_attr(value: &AttrValue) -> Option<Self>;
}

impl FromAttrValue for bool {
	fn from_attr(value: &AttrValue) -> Option<Self> {
		value.as_bool()
	}
}

impl FromAttrValue for i64 {
	fn from_attr(value: &AttrValue) -> Option<Self> {
		value.as_int()
	}
}

impl FromAttrValue for f64 {
	fn from_attr(value: &AttrValue) -> Option<Self> {
		value.as_float()
	}
}

impl FromAttrValue for String {
	fn from_attr(value: &AttrValue) -> Option<Self> {
		value.as_str().map(str::to_string)
	}
}

impl FromAttrValue for Vec<i64> {
	fn from_attr(value: &AttrValue) -> Option<Self> {
		value.as_ints().map(<[i64]>::to_vec)
	}
}

impl FromAttrValue for TypeName {
	fn from_attr(value: &AttrValue) -> Option<Self> {
		value.as_type().map(|t| TypeName(t.to_string()))
	}
}

/// The type of a constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
	Bool,
	Int,
	Float,
	Str,
	Widget,
	Opaque,
}

/// A constructor argument passed to [`GuiModel::of`](crate::model::GuiModel::of).
#[derive(Clone)]
pub enum Arg {
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(String),
	Widget(WidgetRef),
	Opaque(Arc<dyn Any + Send + Sync>),
}

impl Arg {
	pub fn arg_type(&self) -> ArgType {
		match self {
			Arg::Bool(_) => ArgType::Bool,
			Arg::Int(_) => ArgType::Int,
			Arg::Float(_) => ArgType::Float,
			Arg::Str(_) => ArgType::Str,
			Arg::Widget(_) => ArgType::Widget,
			Arg::Opaque(_) => ArgType::Opaque,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Arg::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Arg::Int(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Arg::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Arg::Str(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_widget(&self) -> Option<&WidgetRef> {
		match self {
			Arg::Widget(v) => Some(v),
			_ => None,
		}
	}

	/// Downcasts an opaque argument.
	pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		match self {
			Arg::Opaque(v) => v.clone().downcast::<T>().ok(),
			_ => None,
		}
	}
}

impl fmt::Debug for Arg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Arg::Bool(v) => write!(f, "Arg::Bool({v})"),
			Arg::Int(v) => write!(f, "Arg::Int({v})"),
			Arg::Float(v) => write!(f, "Arg::Float({v})"),
			Arg::Str(v) => write!(f, "Arg::Str({v:?})"),
			Arg::Widget(w) => write!(f, "Arg::Widget({})", w.type_name()),
			Arg::Opaque(_) => f.write_str("Arg::Opaque(..)"),
		}
	}
}

impl From<bool> for Arg {
	fn from(v: bool) -> Self {
		Arg::Bool(v)
	}
}

impl From<i64> for Arg {
	fn from(v: i64) -> Self {
		Arg::Int(v)
	}
}

impl From<&str> for Arg {
	fn from(v: &str) -> Self {
		Arg::Str(v.to_string())
	}
}

impl From<String> for Arg {
	fn from(v: String) -> Self {
		Arg::Str(v)
	}
}

/// Renders an argument list as a parameter signature, e.g. `str, int`.
pub(crate) fn signature(args: &[Arg]) -> String {
	args.iter()
		.map(|a| match a.arg_type() {
			ArgType::Bool => "bool",
			ArgType::Int => "int",
			ArgType::Float => "float",
			ArgType::Str => "str",
			ArgType::Widget => "widget",
			ArgType::Opaque => "opaque",
		})
		.collect::<Vec<_>>()
		.join(", ")
}
