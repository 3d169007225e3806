//! The fixed-shape attributes: count, then N records resolved through the
//! pool. No recursion (except `Record`, whose components carry their own
//! attribute tables) and no cross-attribute correlation.

use anyhow::Result;
use crate::AttrRead;
use crate::pool::{Constant, ConstantPool, LinkConstant};
use crate::version::Version;
use super::annotation::ElementValue;
use super::{read_attribute_table, AttributeMap};

#[derive(Debug, Clone, PartialEq)]
pub struct InnerClass {
	pub inner_class: String,
	pub outer_class: Option<String>,
	/// The simple name, absent for anonymous classes.
	pub inner_name: Option<String>,
	pub access_flags: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InnerClassesAttribute {
	pub classes: Vec<InnerClass>,
}

impl InnerClassesAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<InnerClassesAttribute> {
		let classes = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| Ok(InnerClass {
				inner_class: pool.class_name(r.read_u16()?)?,
				outer_class: pool.optional(r.read_u16()?, ConstantPool::class_name)?,
				inner_name: pool.optional(r.read_u16()?, ConstantPool::utf8)?,
				access_flags: r.read_u16()?,
			})
		)?;
		Ok(InnerClassesAttribute { classes })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantValueAttribute {
	pub value: Constant,
}

impl ConstantValueAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<ConstantValueAttribute> {
		Ok(ConstantValueAttribute { value: pool.constant(reader.read_u16()?)? })
	}
}

/// The `Signature` attribute; one generic signature string.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureAttribute {
	pub signature: String,
}

impl SignatureAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<SignatureAttribute> {
		Ok(SignatureAttribute { signature: pool.utf8(reader.read_u16()?)? })
	}
}

/// The default value of one annotation interface element.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDefaultAttribute {
	pub value: ElementValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionsAttribute {
	/// Class names of the declared thrown exceptions.
	pub exceptions: Vec<String>,
}

impl ExceptionsAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<ExceptionsAttribute> {
		let exceptions = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| pool.class_name(r.read_u16()?)
		)?;
		Ok(ExceptionsAttribute { exceptions })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnclosingMethodAttribute {
	pub class: String,
	/// `(name, descriptor)` of the enclosing method; absent when the class
	/// is only enclosed lexically (instance initializer, field initializer).
	pub method: Option<(String, String)>,
}

impl EnclosingMethodAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<EnclosingMethodAttribute> {
		Ok(EnclosingMethodAttribute {
			class: pool.class_name(reader.read_u16()?)?,
			method: pool.optional(reader.read_u16()?, ConstantPool::name_and_type)?,
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineNumberTableAttribute {
	/// `(start_pc, line_number)` pairs, in wire order.
	pub entries: Vec<(u16, u16)>,
}

impl LineNumberTableAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead) -> Result<LineNumberTableAttribute> {
		let entries = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| Ok((r.read_u16()?, r.read_u16()?))
		)?;
		Ok(LineNumberTableAttribute { entries })
	}

	/// The line number of the last entry whose start offset is at or before
	/// `pc`, or `None` when the table is empty or `pc` precedes every
	/// entry.
	///
	/// The scan walks backwards so the latest matching entry wins when
	/// entries are not strictly monotonic.
	pub fn find_line_number(&self, pc: u16) -> Option<u16> {
		self.entries.iter().rev()
			.find(|&&(start, _)| start <= pc)
			.map(|&(_, line)| line)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodParameter {
	/// Absent for unnamed (purely positional) parameters.
	pub name: Option<String>,
	pub access_flags: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodParametersAttribute {
	pub parameters: Vec<MethodParameter>,
}

impl MethodParametersAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<MethodParametersAttribute> {
		let parameters = reader.read_vec(
			|r| r.read_u8_as_usize(),
			|r| Ok(MethodParameter {
				name: pool.optional(r.read_u16()?, ConstantPool::utf8)?,
				access_flags: r.read_u16()?,
			})
		)?;
		Ok(MethodParametersAttribute { parameters })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapMethod {
	pub handle: LinkConstant,
	pub arguments: Vec<Constant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapMethodsAttribute {
	methods: Vec<BootstrapMethod>,
}

impl BootstrapMethodsAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<BootstrapMethodsAttribute> {
		let methods = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| Ok(BootstrapMethod {
				handle: pool.link(r.read_u16()?)?,
				arguments: r.read_vec(
					|r| r.read_u16_as_usize(),
					|r| pool.constant(r.read_u16()?)
				)?,
			})
		)?;
		Ok(BootstrapMethodsAttribute { methods })
	}

	/// Bootstrap method indices are dense 0-based array positions;
	/// `invokedynamic` and dynamic constants address them this way.
	pub fn get(&self, index: usize) -> Option<&BootstrapMethod> {
		self.methods.get(index)
	}

	pub fn methods(&self) -> &[BootstrapMethod] {
		&self.methods
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordComponent {
	pub name: String,
	pub descriptor: String,
	/// Components carry their own attribute table (`Signature`, runtime
	/// annotations), decoded through the same dispatcher.
	pub attributes: AttributeMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordAttribute {
	pub components: Vec<RecordComponent>,
}

impl RecordAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool, version: Version) -> Result<RecordAttribute> {
		let components = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| Ok(RecordComponent {
				name: pool.utf8(r.read_u16()?)?,
				descriptor: pool.utf8(r.read_u16()?)?,
				attributes: read_attribute_table(r, pool, version)?,
			})
		)?;
		Ok(RecordAttribute { components })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PermittedSubclassesAttribute {
	pub classes: Vec<String>,
}

impl PermittedSubclassesAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<PermittedSubclassesAttribute> {
		let classes = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| pool.class_name(r.read_u16()?)
		)?;
		Ok(PermittedSubclassesAttribute { classes })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFileAttribute {
	pub source_file: String,
}

impl SourceFileAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<SourceFileAttribute> {
		Ok(SourceFileAttribute { source_file: pool.utf8(reader.read_u16()?)? })
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn line_number_backward_scan() {
		let table = LineNumberTableAttribute {
			entries: vec![(0, 10), (4, 11), (9, 12)],
		};

		assert_eq!(table.find_line_number(0), Some(10));
		assert_eq!(table.find_line_number(3), Some(10));
		assert_eq!(table.find_line_number(4), Some(11));
		assert_eq!(table.find_line_number(100), Some(12));
	}

	#[test]
	fn line_number_latest_entry_wins() {
		// not strictly monotonic: two entries share start_pc 4
		let table = LineNumberTableAttribute {
			entries: vec![(0, 10), (4, 11), (4, 13)],
		};
		assert_eq!(table.find_line_number(5), Some(13));
	}

	#[test]
	fn line_number_unknown() {
		let empty = LineNumberTableAttribute { entries: Vec::new() };
		assert_eq!(empty.find_line_number(3), None);

		let table = LineNumberTableAttribute { entries: vec![(8, 20)] };
		// pc precedes every entry
		assert_eq!(table.find_line_number(7), None);
	}
}
