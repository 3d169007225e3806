//! Type annotations: a plain annotation plus *where on a type* it sits.

use anyhow::{bail, Result};
use crate::AttrRead;
use crate::class_constants::type_annotation;
use crate::pool::ConstantPool;
use super::annotation::{read_annotation, Annotation};

/// States exactly which type the annotation is on.
///
/// The `target_type` byte on the wire selects the variant; this set is
/// closed, a byte outside it aborts the decode.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetInfo {
	/// On a type parameter of a generic class or interface.
	ClassTypeParameter { index: u8 },
	/// On a type parameter of a generic method or constructor.
	MethodTypeParameter { index: u8 },
	/// On the superclass or a superinterface in an `extends`/`implements`
	/// clause; `u16::MAX` means the superclass.
	Supertype { index: u16 },
	/// On a bound of a class/interface type parameter.
	ClassTypeParameterBound { type_parameter_index: u8, bound_index: u8 },
	/// On a bound of a method/constructor type parameter.
	MethodTypeParameterBound { type_parameter_index: u8, bound_index: u8 },
	/// On the type of a field or record component declaration.
	Field,
	/// On the return type of a method.
	MethodReturn,
	/// On the receiver type of a method or constructor.
	MethodReceiver,
	/// On the type of a formal parameter.
	FormalParameter { index: u8 },
	/// On a type in the `throws` clause.
	Throws { index: u16 },
	/// On the type of a local variable declaration; one `(start_pc, length,
	/// slot)` triple per range the variable lives in.
	LocalVariable { table: Vec<LocalVariableTarget> },
	/// Same shape, for try-with-resources variables.
	ResourceVariable { table: Vec<LocalVariableTarget> },
	/// On the type of an exception parameter; indexes the exception table.
	ExceptionParameter { index: u16 },
	/// On the type of an `instanceof` expression, at this bytecode offset.
	InstanceOf { offset: u16 },
	/// On the type of a `new` expression.
	New { offset: u16 },
	/// On the type before `::new` of a constructor reference.
	ConstructorReference { offset: u16 },
	/// On the type before `::` of a method reference.
	MethodReference { offset: u16 },
	/// On the `index`th type of a cast expression.
	Cast { offset: u16, index: u8 },
	/// On the `index`th explicit type argument of a constructor call.
	ConstructorInvocationTypeArgument { offset: u16, index: u8 },
	/// On the `index`th explicit type argument of a method call.
	MethodInvocationTypeArgument { offset: u16, index: u8 },
	/// On the `index`th explicit type argument of a constructor reference.
	ConstructorReferenceTypeArgument { offset: u16, index: u8 },
	/// On the `index`th explicit type argument of a method reference.
	MethodReferenceTypeArgument { offset: u16, index: u8 },
}

/// One range of a local/resource variable target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalVariableTarget {
	pub start: u16,
	pub length: u16,
	pub index: u16,
}

/// One step into a type; the `type_path` locates the annotation inside a
/// compound type (array element, nested type, wildcard bound, type
/// argument).
#[derive(Debug, Clone, PartialEq)]
pub enum TypePathKind {
	ArrayDeeper,
	NestedDeeper,
	WildcardBound,
	TypeArgument { index: u8 },
}

/// Specifies exactly where in the type the annotation is.
#[derive(Debug, Clone, PartialEq)]
pub struct TypePath {
	pub path: Vec<TypePathKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
	pub target: TargetInfo,
	pub type_path: TypePath,
	pub annotation: Annotation,
}

/// Reads the payload of the two `Runtime...TypeAnnotations` attributes.
pub(crate) fn read_type_annotations_list(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<Vec<TypeAnnotation>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| {
			let target = read_target_info(r)?;
			let type_path = read_type_path(r)?;
			let annotation = read_annotation(r, pool)?;
			Ok(TypeAnnotation { target, type_path, annotation })
		}
	)
}

fn read_target_info(reader: &mut impl AttrRead) -> Result<TargetInfo> {
	Ok(match reader.read_u8()? {
		type_annotation::CLASS_TYPE_PARAMETER => TargetInfo::ClassTypeParameter { index: reader.read_u8()? },
		type_annotation::METHOD_TYPE_PARAMETER => TargetInfo::MethodTypeParameter { index: reader.read_u8()? },
		type_annotation::CLASS_EXTENDS => TargetInfo::Supertype { index: reader.read_u16()? },
		type_annotation::CLASS_TYPE_PARAMETER_BOUND => {
			let type_parameter_index = reader.read_u8()?;
			let bound_index = reader.read_u8()?;
			TargetInfo::ClassTypeParameterBound { type_parameter_index, bound_index }
		},
		type_annotation::METHOD_TYPE_PARAMETER_BOUND => {
			let type_parameter_index = reader.read_u8()?;
			let bound_index = reader.read_u8()?;
			TargetInfo::MethodTypeParameterBound { type_parameter_index, bound_index }
		},
		type_annotation::FIELD => TargetInfo::Field,
		type_annotation::METHOD_RETURN => TargetInfo::MethodReturn,
		type_annotation::METHOD_RECEIVER => TargetInfo::MethodReceiver,
		type_annotation::METHOD_FORMAL_PARAMETER => TargetInfo::FormalParameter { index: reader.read_u8()? },
		type_annotation::THROWS => TargetInfo::Throws { index: reader.read_u16()? },
		type_annotation::LOCAL_VARIABLE => TargetInfo::LocalVariable { table: read_local_variable_target(reader)? },
		type_annotation::RESOURCE_VARIABLE => TargetInfo::ResourceVariable { table: read_local_variable_target(reader)? },
		type_annotation::EXCEPTION_PARAMETER => TargetInfo::ExceptionParameter { index: reader.read_u16()? },
		type_annotation::INSTANCE_OF => TargetInfo::InstanceOf { offset: reader.read_u16()? },
		type_annotation::NEW => TargetInfo::New { offset: reader.read_u16()? },
		type_annotation::CONSTRUCTOR_REFERENCE => TargetInfo::ConstructorReference { offset: reader.read_u16()? },
		type_annotation::METHOD_REFERENCE => TargetInfo::MethodReference { offset: reader.read_u16()? },
		type_annotation::CAST => {
			let offset = reader.read_u16()?;
			let index = reader.read_u8()?;
			TargetInfo::Cast { offset, index }
		},
		type_annotation::CONSTRUCTOR_INVOCATION_TYPE_ARGUMENT => {
			let offset = reader.read_u16()?;
			let index = reader.read_u8()?;
			TargetInfo::ConstructorInvocationTypeArgument { offset, index }
		},
		type_annotation::METHOD_INVOCATION_TYPE_ARGUMENT => {
			let offset = reader.read_u16()?;
			let index = reader.read_u8()?;
			TargetInfo::MethodInvocationTypeArgument { offset, index }
		},
		type_annotation::CONSTRUCTOR_REFERENCE_TYPE_ARGUMENT => {
			let offset = reader.read_u16()?;
			let index = reader.read_u8()?;
			TargetInfo::ConstructorReferenceTypeArgument { offset, index }
		},
		type_annotation::METHOD_REFERENCE_TYPE_ARGUMENT => {
			let offset = reader.read_u16()?;
			let index = reader.read_u8()?;
			TargetInfo::MethodReferenceTypeArgument { offset, index }
		},
		tag => bail!("unknown type annotation target_type {tag:#04x}"),
	})
}

fn read_local_variable_target(reader: &mut impl AttrRead) -> Result<Vec<LocalVariableTarget>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| {
			let start = r.read_u16()?;
			let length = r.read_u16()?;
			let index = r.read_u16()?;
			Ok(LocalVariableTarget { start, length, index })
		}
	)
}

fn read_type_path(reader: &mut impl AttrRead) -> Result<TypePath> {
	let mut path = Vec::new();
	for _ in 0..reader.read_u8()? {
		let type_path_kind = reader.read_u8()?;
		let type_argument_index = reader.read_u8()?;
		let step = match type_path_kind {
			kind @ 0..=2 => {
				let step = match kind {
					0 => TypePathKind::ArrayDeeper,
					1 => TypePathKind::NestedDeeper,
					2 => TypePathKind::WildcardBound,
					_ => unreachable!(),
				};
				if type_argument_index != 0 {
					bail!("for {step:?}, type_argument_index must be zero, got {type_argument_index}");
				}
				step
			},
			3 => TypePathKind::TypeArgument { index: type_argument_index },
			kind => bail!("type_path_kind not in range from 0 to 3, got {kind}"),
		};
		path.push(step);
	}
	Ok(TypePath { path })
}

#[cfg(test)]
mod testing {
	use std::io::Cursor;
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn target_info_shapes() -> Result<()> {
		let mut reader = Cursor::new(vec![0x16, 0x02]);
		assert_eq!(read_target_info(&mut reader)?, TargetInfo::FormalParameter { index: 2 });

		let mut reader = Cursor::new(vec![0x13]);
		assert_eq!(read_target_info(&mut reader)?, TargetInfo::Field);

		let mut reader = Cursor::new(vec![0x47, 0x00, 0x10, 0x01]);
		assert_eq!(read_target_info(&mut reader)?, TargetInfo::Cast { offset: 16, index: 1 });

		// localvar_target: one (start, length, slot) entry
		let mut reader = Cursor::new(vec![0x40, 0x00, 0x01, 0x00, 0x05, 0x00, 0x0a, 0x00, 0x03]);
		assert_eq!(read_target_info(&mut reader)?, TargetInfo::LocalVariable {
			table: vec![LocalVariableTarget { start: 5, length: 10, index: 3 }],
		});

		Ok(())
	}

	#[test]
	fn unknown_target_type_is_fatal() {
		let mut reader = Cursor::new(vec![0x60]);
		assert!(read_target_info(&mut reader).is_err());
	}

	#[test]
	fn type_path_validation() -> Result<()> {
		let mut reader = Cursor::new(vec![0x02, 0x00, 0x00, 0x03, 0x01]);
		let path = read_type_path(&mut reader)?;
		assert_eq!(path.path, vec![TypePathKind::ArrayDeeper, TypePathKind::TypeArgument { index: 1 }]);

		// kinds 0 to 2 require a zero argument index
		let mut reader = Cursor::new(vec![0x01, 0x01, 0x05]);
		assert!(read_type_path(&mut reader).is_err());

		let mut reader = Cursor::new(vec![0x01, 0x04, 0x00]);
		assert!(read_type_path(&mut reader).is_err());

		Ok(())
	}
}
