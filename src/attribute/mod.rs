//! The attribute variants and the name dispatcher.
//!
//! [`decode_attribute`] is the factory: it maps an attribute's name to its
//! decoded variant, consuming exactly that attribute's bytes from the
//! cursor. Unrecognized names yield `Ok(None)`: the format is designed so
//! unknown attributes are skippable by their declared length, and a class
//! file full of attributes this crate never heard of must still decode.

use anyhow::Result;
use indexmap::IndexMap;
use crate::AttrRead;
use crate::class_constants::attribute;
use crate::pool::ConstantPool;
use crate::version::Version;

pub mod annotation;
pub mod code;
pub mod general;
pub mod local_variable;
pub mod module;
pub mod type_annotation;

use annotation::{read_annotations_list, read_element_value, read_parameter_annotations, Annotation};
use code::CodeAttribute;
use general::{
	AnnotationDefaultAttribute, BootstrapMethodsAttribute, ConstantValueAttribute,
	EnclosingMethodAttribute, ExceptionsAttribute, InnerClassesAttribute,
	LineNumberTableAttribute, MethodParametersAttribute, PermittedSubclassesAttribute,
	RecordAttribute, SignatureAttribute, SourceFileAttribute,
};
use local_variable::{LocalVariableTableAttribute, LocalVariableTypeTableAttribute};
use module::ModuleAttribute;
use type_annotation::{read_type_annotations_list, TypeAnnotation};

/// The attributes of one class, field, method or code body, keyed by
/// attribute name in the order they appeared.
pub type AttributeMap = IndexMap<String, Attribute>;

/// A decoded attribute. One variant per recognized attribute name; decoding
/// produces a fully built value, there is no partially constructed state.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
	Code(CodeAttribute),
	InnerClasses(InnerClassesAttribute),
	ConstantValue(ConstantValueAttribute),
	Signature(SignatureAttribute),
	AnnotationDefault(AnnotationDefaultAttribute),
	Exceptions(ExceptionsAttribute),
	EnclosingMethod(EnclosingMethodAttribute),
	Annotations(AnnotationsAttribute),
	ParameterAnnotations(ParameterAnnotationsAttribute),
	TypeAnnotations(TypeAnnotationsAttribute),
	LocalVariableTable(LocalVariableTableAttribute),
	LocalVariableTypeTable(LocalVariableTypeTableAttribute),
	BootstrapMethods(BootstrapMethodsAttribute),
	LineNumberTable(LineNumberTableAttribute),
	MethodParameters(MethodParametersAttribute),
	Module(ModuleAttribute),
	Record(RecordAttribute),
	PermittedSubclasses(PermittedSubclassesAttribute),
	SourceFile(SourceFileAttribute),
	/// The `Synthetic` marker; its presence is the whole payload.
	Synthetic,
	/// The `Deprecated` marker; its presence is the whole payload.
	Deprecated,
}

/// The payload of `RuntimeVisibleAnnotations` or
/// `RuntimeInvisibleAnnotations`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationsAttribute {
	pub visible: bool,
	pub annotations: Vec<Annotation>,
}

/// The payload of the two `Runtime...ParameterAnnotations` attributes: one
/// annotation list per method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAnnotationsAttribute {
	pub visible: bool,
	pub parameters: Vec<Vec<Annotation>>,
}

/// The payload of the two `Runtime...TypeAnnotations` attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotationsAttribute {
	pub visible: bool,
	pub annotations: Vec<TypeAnnotation>,
}

impl Attribute {
	/// The attribute name this variant decodes from.
	pub fn name(&self) -> &'static str {
		match self {
			Attribute::Code(_) => attribute::CODE,
			Attribute::InnerClasses(_) => attribute::INNER_CLASSES,
			Attribute::ConstantValue(_) => attribute::CONSTANT_VALUE,
			Attribute::Signature(_) => attribute::SIGNATURE,
			Attribute::AnnotationDefault(_) => attribute::ANNOTATION_DEFAULT,
			Attribute::Exceptions(_) => attribute::EXCEPTIONS,
			Attribute::EnclosingMethod(_) => attribute::ENCLOSING_METHOD,
			Attribute::Annotations(a) if a.visible => attribute::RUNTIME_VISIBLE_ANNOTATIONS,
			Attribute::Annotations(_) => attribute::RUNTIME_INVISIBLE_ANNOTATIONS,
			Attribute::ParameterAnnotations(a) if a.visible => attribute::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS,
			Attribute::ParameterAnnotations(_) => attribute::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS,
			Attribute::TypeAnnotations(a) if a.visible => attribute::RUNTIME_VISIBLE_TYPE_ANNOTATIONS,
			Attribute::TypeAnnotations(_) => attribute::RUNTIME_INVISIBLE_TYPE_ANNOTATIONS,
			Attribute::LocalVariableTable(_) => attribute::LOCAL_VARIABLE_TABLE,
			Attribute::LocalVariableTypeTable(_) => attribute::LOCAL_VARIABLE_TYPE_TABLE,
			Attribute::BootstrapMethods(_) => attribute::BOOTSTRAP_METHODS,
			Attribute::LineNumberTable(_) => attribute::LINE_NUMBER_TABLE,
			Attribute::MethodParameters(_) => attribute::METHOD_PARAMETERS,
			Attribute::Module(_) => attribute::MODULE,
			Attribute::Record(_) => attribute::RECORD,
			Attribute::PermittedSubclasses(_) => attribute::PERMITTED_SUBCLASSES,
			Attribute::SourceFile(_) => attribute::SOURCE_FILE,
			Attribute::Synthetic => attribute::SYNTHETIC,
			Attribute::Deprecated => attribute::DEPRECATED,
		}
	}
}

/// Decodes the content of one attribute, selected by name.
///
/// Consumes exactly the attribute's own bytes from the cursor. Returns
/// `Ok(None)` for unrecognized names *without touching the cursor*; the
/// caller is responsible for skipping the declared `attribute_length` then.
/// This never fails on an unknown name; new attribute kinds in newer class
/// files are normal and must not abort decoding.
pub fn decode_attribute(
	name: &str,
	reader: &mut impl AttrRead,
	pool: &impl ConstantPool,
	version: Version,
) -> Result<Option<Attribute>> {
	Ok(Some(match name {
		name if name == attribute::CODE => Attribute::Code(CodeAttribute::decode(reader, pool, version)?),
		name if name == attribute::INNER_CLASSES => Attribute::InnerClasses(InnerClassesAttribute::decode(reader, pool)?),
		name if name == attribute::CONSTANT_VALUE => Attribute::ConstantValue(ConstantValueAttribute::decode(reader, pool)?),
		name if name == attribute::SIGNATURE => Attribute::Signature(SignatureAttribute::decode(reader, pool)?),
		name if name == attribute::ANNOTATION_DEFAULT => Attribute::AnnotationDefault(AnnotationDefaultAttribute {
			value: read_element_value(reader, pool)?,
		}),
		name if name == attribute::EXCEPTIONS => Attribute::Exceptions(ExceptionsAttribute::decode(reader, pool)?),
		name if name == attribute::ENCLOSING_METHOD => Attribute::EnclosingMethod(EnclosingMethodAttribute::decode(reader, pool)?),
		name if name == attribute::RUNTIME_VISIBLE_ANNOTATIONS => Attribute::Annotations(AnnotationsAttribute {
			visible: true,
			annotations: read_annotations_list(reader, pool)?,
		}),
		name if name == attribute::RUNTIME_INVISIBLE_ANNOTATIONS => Attribute::Annotations(AnnotationsAttribute {
			visible: false,
			annotations: read_annotations_list(reader, pool)?,
		}),
		name if name == attribute::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS => Attribute::ParameterAnnotations(ParameterAnnotationsAttribute {
			visible: true,
			parameters: read_parameter_annotations(reader, pool)?,
		}),
		name if name == attribute::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS => Attribute::ParameterAnnotations(ParameterAnnotationsAttribute {
			visible: false,
			parameters: read_parameter_annotations(reader, pool)?,
		}),
		name if name == attribute::RUNTIME_VISIBLE_TYPE_ANNOTATIONS => Attribute::TypeAnnotations(TypeAnnotationsAttribute {
			visible: true,
			annotations: read_type_annotations_list(reader, pool)?,
		}),
		name if name == attribute::RUNTIME_INVISIBLE_TYPE_ANNOTATIONS => Attribute::TypeAnnotations(TypeAnnotationsAttribute {
			visible: false,
			annotations: read_type_annotations_list(reader, pool)?,
		}),
		name if name == attribute::LOCAL_VARIABLE_TABLE => Attribute::LocalVariableTable(LocalVariableTableAttribute::decode(reader, pool)?),
		name if name == attribute::LOCAL_VARIABLE_TYPE_TABLE => Attribute::LocalVariableTypeTable(LocalVariableTypeTableAttribute::decode(reader, pool)?),
		name if name == attribute::BOOTSTRAP_METHODS => Attribute::BootstrapMethods(BootstrapMethodsAttribute::decode(reader, pool)?),
		name if name == attribute::LINE_NUMBER_TABLE => Attribute::LineNumberTable(LineNumberTableAttribute::decode(reader)?),
		name if name == attribute::METHOD_PARAMETERS => Attribute::MethodParameters(MethodParametersAttribute::decode(reader, pool)?),
		name if name == attribute::MODULE => Attribute::Module(ModuleAttribute::decode(reader, pool)?),
		name if name == attribute::RECORD => Attribute::Record(RecordAttribute::decode(reader, pool, version)?),
		name if name == attribute::PERMITTED_SUBCLASSES => Attribute::PermittedSubclasses(PermittedSubclassesAttribute::decode(reader, pool)?),
		name if name == attribute::SOURCE_FILE => Attribute::SourceFile(SourceFileAttribute::decode(reader, pool)?),
		name if name == attribute::SYNTHETIC => Attribute::Synthetic,
		name if name == attribute::DEPRECATED => Attribute::Deprecated,
		_ => return Ok(None),
	}))
}

/// Reads a whole `attributes_count` + `attributes` section into a name-keyed
/// map.
///
/// Unrecognized attributes are skipped by their declared length, and declared
/// bytes a decoder leaves unread are skipped too, so the cursor always ends
/// up at the declared end of each attribute. A repeated `LocalVariableTable`
/// or `LocalVariableTypeTable` is merged into the already-read one (compilers
/// emit several for split method bodies); any other repeated name replaces
/// the earlier entry. After everything is read, a present type table has its
/// signatures spliced into the primary table.
pub fn read_attribute_table(
	reader: &mut impl AttrRead,
	pool: &impl ConstantPool,
	version: Version,
) -> Result<AttributeMap> {
	let mut map = AttributeMap::new();

	let count = reader.read_u16()?;
	for _ in 0..count {
		let name = pool.utf8(reader.read_u16()?)?;
		let length = reader.read_u32()?;
		let content_start = reader.position()?;

		match decode_attribute(&name, reader, pool, version)? {
			None => {
				log::trace!("skipping unknown attribute {name:?} ({length} bytes)");
				reader.skip(length as i64)?;
			},
			Some(decoded) => {
				let leftover = reader.remaining(content_start, length)?;
				if leftover > 0 {
					log::trace!("attribute {name:?} declared {length} bytes, skipping {leftover} unread");
					reader.skip(leftover as i64)?;
				}

				match decoded {
					Attribute::LocalVariableTable(table) => {
						match map.get_mut(attribute::LOCAL_VARIABLE_TABLE) {
							Some(Attribute::LocalVariableTable(existing)) => existing.merge(&table),
							_ => { map.insert(name, Attribute::LocalVariableTable(table)); },
						}
					},
					Attribute::LocalVariableTypeTable(table) => {
						match map.get_mut(attribute::LOCAL_VARIABLE_TYPE_TABLE) {
							Some(Attribute::LocalVariableTypeTable(existing)) => existing.merge(&table),
							_ => { map.insert(name, Attribute::LocalVariableTypeTable(table)); },
						}
					},
					decoded => {
						map.insert(name, decoded);
					},
				}
			},
		}
	}

	// The type table never stands on its own; its entries annotate the
	// primary table's.
	if let Some(Attribute::LocalVariableTypeTable(types)) = map.get(attribute::LOCAL_VARIABLE_TYPE_TABLE).cloned() {
		if let Some(Attribute::LocalVariableTable(table)) = map.get_mut(attribute::LOCAL_VARIABLE_TABLE) {
			table.merge_signatures(&types);
		}
	}

	Ok(map)
}
