//! The `Code` attribute.
//!
//! The method body itself is not decoded here; the code bytes and the raw
//! exception table are carried as one opaque, canonically repacked blob for
//! the instruction decoder further down the pipeline.

use anyhow::Result;
use crate::AttrRead;
use crate::pool::ConstantPool;
use crate::version::Version;
use super::{read_attribute_table, AttributeMap};

#[derive(Debug, Clone, PartialEq)]
pub struct CodeAttribute {
	pub max_stack: u16,
	pub max_locals: u16,
	/// The canonical repack of the body: `u32` code length, the code bytes,
	/// `u16` exception table entry count, then the raw 8-byte entries.
	/// Always this one shape, no matter which layout was on the wire.
	code_and_exception_data: Vec<u8>,
	/// The sub-attributes of the code body (`LineNumberTable`,
	/// `LocalVariableTable`, ...), decoded through the same dispatcher.
	pub attributes: AttributeMap,
}

impl CodeAttribute {
	pub(crate) fn decode(
		reader: &mut impl AttrRead,
		pool: &impl ConstantPool,
		version: Version,
	) -> Result<CodeAttribute> {
		// Class files older than 45.3 pack max stack/locals into single
		// bytes and the code length into two.
		let (max_stack, max_locals, code_length) = if version.has_legacy_code_layout() {
			(reader.read_u8()? as u16, reader.read_u8()? as u16, reader.read_u16()? as u32)
		} else {
			(reader.read_u16()?, reader.read_u16()?, reader.read_u32()?)
		};

		let code = reader.read_u8_vec(code_length as usize)?;

		let exception_count = reader.read_u16()?;
		let exception_data = reader.read_u8_vec(exception_count as usize * 8)?;

		let mut code_and_exception_data = Vec::with_capacity(4 + code.len() + 2 + exception_data.len());
		code_and_exception_data.extend_from_slice(&code_length.to_be_bytes());
		code_and_exception_data.extend_from_slice(&code);
		code_and_exception_data.extend_from_slice(&exception_count.to_be_bytes());
		code_and_exception_data.extend_from_slice(&exception_data);

		let attributes = read_attribute_table(reader, pool, version)?;

		Ok(CodeAttribute { max_stack, max_locals, code_and_exception_data, attributes })
	}

	/// The canonical body bytes; see the field docs for the exact shape.
	pub fn code_and_exception_data(&self) -> &[u8] {
		&self.code_and_exception_data
	}
}

#[cfg(test)]
mod testing {
	use std::io::Cursor;
	use anyhow::bail;
	use pretty_assertions::assert_eq;
	use crate::pool::{Constant, LinkConstant};
	use super::*;

	/// The payloads below carry no nested attributes, so the pool is never
	/// consulted.
	struct EmptyPool;

	impl ConstantPool for EmptyPool {
		fn utf8(&self, index: u16) -> Result<String> {
			bail!("no pool entry at index {index}")
		}
		fn class_name(&self, index: u16) -> Result<String> {
			bail!("no pool entry at index {index}")
		}
		fn module_name(&self, index: u16) -> Result<String> {
			bail!("no pool entry at index {index}")
		}
		fn package_name(&self, index: u16) -> Result<String> {
			bail!("no pool entry at index {index}")
		}
		fn name_and_type(&self, index: u16) -> Result<(String, String)> {
			bail!("no pool entry at index {index}")
		}
		fn link(&self, index: u16) -> Result<LinkConstant> {
			bail!("no pool entry at index {index}")
		}
		fn constant(&self, index: u16) -> Result<Constant> {
			bail!("no pool entry at index {index}")
		}
	}

	// iconst_0, ireturn, plus one exception table entry
	const CODE: [u8; 2] = [0x03, 0xac];
	const EXCEPTION_ENTRY: [u8; 8] = [0x00, 0x00, 0x00, 0x02, 0x00, 0x02, 0x00, 0x00];

	fn modern_payload() -> Vec<u8> {
		let mut payload = Vec::new();
		payload.extend_from_slice(&2u16.to_be_bytes()); // max_stack
		payload.extend_from_slice(&3u16.to_be_bytes()); // max_locals
		payload.extend_from_slice(&(CODE.len() as u32).to_be_bytes());
		payload.extend_from_slice(&CODE);
		payload.extend_from_slice(&1u16.to_be_bytes());
		payload.extend_from_slice(&EXCEPTION_ENTRY);
		payload.extend_from_slice(&0u16.to_be_bytes()); // no sub-attributes
		payload
	}

	fn legacy_payload() -> Vec<u8> {
		let mut payload = Vec::new();
		payload.push(2); // max_stack, one byte
		payload.push(3); // max_locals, one byte
		payload.extend_from_slice(&(CODE.len() as u16).to_be_bytes());
		payload.extend_from_slice(&CODE);
		payload.extend_from_slice(&1u16.to_be_bytes());
		payload.extend_from_slice(&EXCEPTION_ENTRY);
		payload.extend_from_slice(&0u16.to_be_bytes());
		payload
	}

	#[test]
	fn canonicalization_is_layout_independent() -> Result<()> {
		let pool = EmptyPool;

		let modern = CodeAttribute::decode(&mut Cursor::new(modern_payload()), &pool, Version::V1_8)?;
		let legacy = CodeAttribute::decode(&mut Cursor::new(legacy_payload()), &pool, Version::new(45, 0))?;

		assert_eq!(modern.max_stack, 2);
		assert_eq!(modern.max_locals, 3);
		assert_eq!(modern.max_stack, legacy.max_stack);
		assert_eq!(modern.max_locals, legacy.max_locals);

		// both layouts repack to byte-identical canonical output
		assert_eq!(modern.code_and_exception_data(), legacy.code_and_exception_data());

		let mut expected = Vec::new();
		expected.extend_from_slice(&(CODE.len() as u32).to_be_bytes());
		expected.extend_from_slice(&CODE);
		expected.extend_from_slice(&1u16.to_be_bytes());
		expected.extend_from_slice(&EXCEPTION_ENTRY);
		assert_eq!(modern.code_and_exception_data(), expected);

		Ok(())
	}

	#[test]
	fn truncated_code_is_fatal() {
		let pool = EmptyPool;
		let mut payload = modern_payload();
		payload.truncate(10);
		assert!(CodeAttribute::decode(&mut Cursor::new(payload), &pool, Version::V1_8).is_err());
	}
}
