//! Annotations and their element values.
//!
//! An annotation is a type plus named element values; an element value is
//! recursive (arrays of values, values that are themselves annotations).

use std::fmt::{Debug, Formatter};
use anyhow::{anyhow, bail, Result};
use indexmap::IndexMap;
use crate::AttrRead;
use crate::pool::{Constant, ConstantPool};

#[derive(Clone, PartialEq)]
pub struct Annotation {
	/// The internal binary name of the annotation interface, like
	/// `java/lang/Deprecated`, resolved from the descriptor on the wire.
	pub type_name: String,
	/// Element names are unique within one annotation; the map keeps the
	/// order they appear in on the wire.
	pub elements: IndexMap<String, ElementValue>,
}

impl Debug for Annotation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "@{}", self.type_name)?;
		f.debug_map()
			.entries(self.elements.iter())
			.finish()
	}
}

/// A single `element_value` of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
	Const(ConstValue),
	Enum {
		/// The internal binary name of the enum type.
		type_name: String,
		const_name: String,
	},
	/// A class literal; see [`class_name_from_descriptor`] for what the
	/// string looks like.
	Class(String),
	Annotation(Annotation),
	Array(Vec<ElementValue>),
}

/// A primitive or string constant inside an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
	Byte(i8),
	Char(u16),
	Double(f64),
	Float(f32),
	Integer(i32),
	Long(i64),
	Short(i16),
	Boolean(bool),
	String(String),
}

impl ElementValue {
	/// The name of this value's type, used for array element type
	/// inference. Primitives give their canonical names (`int`, ...),
	/// strings and class literals their well-known classes.
	pub fn type_name(&self) -> String {
		match self {
			ElementValue::Const(c) => match c {
				ConstValue::Byte(_) => "byte",
				ConstValue::Char(_) => "char",
				ConstValue::Double(_) => "double",
				ConstValue::Float(_) => "float",
				ConstValue::Integer(_) => "int",
				ConstValue::Long(_) => "long",
				ConstValue::Short(_) => "short",
				ConstValue::Boolean(_) => "boolean",
				ConstValue::String(_) => "java/lang/String",
			}.to_owned(),
			ElementValue::Enum { type_name, .. } => type_name.clone(),
			ElementValue::Class(_) => "java/lang/Class".to_owned(),
			ElementValue::Annotation(annotation) => annotation.type_name.clone(),
			ElementValue::Array(values) => format!("{}[]", array_element_type(values)),
		}
	}

	/// For an [`ElementValue::Array`], the inferred element type: the first
	/// element's type, or `java/lang/Object` when the array is empty (an
	/// empty array defaults to an object array; there's nothing on the wire
	/// to infer from). `None` for every other variant.
	pub fn array_element_type(&self) -> Option<String> {
		match self {
			ElementValue::Array(values) => Some(array_element_type(values)),
			_ => None,
		}
	}
}

fn array_element_type(values: &[ElementValue]) -> String {
	values.first()
		.map(ElementValue::type_name)
		.unwrap_or_else(|| "java/lang/Object".to_owned())
}

/// Turns a field descriptor into the name consumers expect for a class
/// literal or annotation type:
///
/// - primitive and `void` descriptors become the canonical primitive names
///   (`I` → `int`), never the raw descriptor letter,
/// - object descriptors become internal binary names (`Ljava/lang/Thread;`
///   → `java/lang/Thread`),
/// - array descriptors are kept verbatim (`[I`).
pub fn class_name_from_descriptor(descriptor: &str) -> Result<String> {
	Ok(match descriptor {
		"V" => "void".to_owned(),
		"Z" => "boolean".to_owned(),
		"B" => "byte".to_owned(),
		"C" => "char".to_owned(),
		"S" => "short".to_owned(),
		"I" => "int".to_owned(),
		"J" => "long".to_owned(),
		"F" => "float".to_owned(),
		"D" => "double".to_owned(),
		_ if descriptor.starts_with('[') => descriptor.to_owned(),
		_ => descriptor
			.strip_prefix('L')
			.and_then(|s| s.strip_suffix(';'))
			.map(str::to_owned)
			.ok_or_else(|| anyhow!("not a field descriptor: {descriptor:?}"))?,
	})
}

/// Reads one `annotation` structure: type index, pair count, then that many
/// named element values.
///
/// Mutually recursive with [`read_element_value`] through nested annotations
/// and arrays; the nesting depth is not bounded, so adversarial inputs can
/// exhaust the stack.
pub(crate) fn read_annotation(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<Annotation> {
	let type_name = class_name_from_descriptor(&pool.utf8(reader.read_u16()?)?)?;

	let count = reader.read_u16()?;
	let mut elements = IndexMap::with_capacity(count as usize);
	for _ in 0..count {
		let name = pool.utf8(reader.read_u16()?)?;
		let value = read_element_value(reader, pool)?;
		elements.insert(name, value);
	}

	Ok(Annotation { type_name, elements })
}

/// Reads one tagged `element_value`.
///
/// An unknown tag is fatal: the format gives no way to skip an unrecognized
/// sub-structure, so a bad tag means corrupt input or a class file version
/// this crate doesn't know.
pub(crate) fn read_element_value(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<ElementValue> {
	Ok(match reader.read_u8()? {
		b'B' => ElementValue::Const(ConstValue::Byte(read_integer(reader, pool)? as i8)),
		b'C' => ElementValue::Const(ConstValue::Char(read_integer(reader, pool)? as u16)),
		b'S' => ElementValue::Const(ConstValue::Short(read_integer(reader, pool)? as i16)),
		b'Z' => ElementValue::Const(ConstValue::Boolean(read_integer(reader, pool)? != 0)),
		b'I' => ElementValue::Const(ConstValue::Integer(read_integer(reader, pool)?)),
		b'J' => {
			let index = reader.read_u16()?;
			match pool.constant(index)? {
				Constant::Long(long) => ElementValue::Const(ConstValue::Long(long)),
				other => bail!("element value at pool index {index} is not a long: {other:?}"),
			}
		},
		b'F' => {
			let index = reader.read_u16()?;
			match pool.constant(index)? {
				Constant::Float(float) => ElementValue::Const(ConstValue::Float(float)),
				other => bail!("element value at pool index {index} is not a float: {other:?}"),
			}
		},
		b'D' => {
			let index = reader.read_u16()?;
			match pool.constant(index)? {
				Constant::Double(double) => ElementValue::Const(ConstValue::Double(double)),
				other => bail!("element value at pool index {index} is not a double: {other:?}"),
			}
		},
		b's' => ElementValue::Const(ConstValue::String(pool.utf8(reader.read_u16()?)?)),
		b'e' => {
			let type_name = class_name_from_descriptor(&pool.utf8(reader.read_u16()?)?)?;
			let const_name = pool.utf8(reader.read_u16()?)?;
			ElementValue::Enum { type_name, const_name }
		},
		b'c' => ElementValue::Class(class_name_from_descriptor(&pool.utf8(reader.read_u16()?)?)?),
		b'@' => ElementValue::Annotation(read_annotation(reader, pool)?),
		b'[' => {
			let values = reader.read_vec(
				|r| r.read_u16_as_usize(),
				|r| read_element_value(r, pool)
			)?;
			ElementValue::Array(values)
		},
		tag => bail!("unknown element_value tag {tag:?}"),
	})
}

fn read_integer(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<i32> {
	let index = reader.read_u16()?;
	match pool.constant(index)? {
		Constant::Integer(integer) => Ok(integer),
		other => bail!("element value at pool index {index} is not an integer: {other:?}"),
	}
}

/// Reads the payload shared by `RuntimeVisibleAnnotations` and
/// `RuntimeInvisibleAnnotations`: a count, then that many annotations.
pub(crate) fn read_annotations_list(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<Vec<Annotation>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| read_annotation(r, pool)
	)
}

/// Reads the payload of the two `Runtime...ParameterAnnotations` attributes:
/// a `u8` parameter count, then one flat annotation list per parameter.
pub(crate) fn read_parameter_annotations(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<Vec<Vec<Annotation>>> {
	reader.read_vec(
		|r| r.read_u8_as_usize(),
		|r| read_annotations_list(r, pool)
	)
}
