//! A crate for decoding the `attribute_info` structures of
//! [Java Class Files](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7).
//!
//! This is the front end of a bytecode-to-IR pipeline: it turns the attribute
//! section of a class, field, method or `Code` body into structured,
//! queryable values. Constant pool storage is *not* implemented here; callers
//! hand in anything implementing [`pool::ConstantPool`].
//!
//! The two entry points are [`attribute::decode_attribute`] for a single
//! named attribute and [`attribute::read_attribute_table`] for a whole
//! `attributes_count` + `attributes` section.

pub mod attribute;
pub mod pool;
pub mod version;

mod class_constants;

pub use attribute::{decode_attribute, read_attribute_table, Attribute, AttributeMap};

use std::io::{Read, Seek, SeekFrom};
use anyhow::{Context, Result};

/// A forward-only cursor over class file bytes.
///
/// All multi-byte reads are big-endian, as everywhere in the class file
/// format. Reading past the end of the underlying data fails with the
/// underlying I/O error; no bounds are checked against any declared
/// `attribute_length` (that's the job of whoever wrote the class file).
pub trait AttrRead {
	fn skip(&mut self, n: i64) -> Result<()>;

	/// The cursor's byte offset from the start of the underlying data.
	fn position(&mut self) -> Result<u64>;

	/// How many of an attribute's declared `attribute_length` bytes are
	/// still unread, given the offset its content started at. Saturates at
	/// zero once the cursor has passed the declared end.
	fn remaining(&mut self, content_start: u64, attribute_length: u32) -> Result<u64> {
		Ok((content_start + attribute_length as u64).saturating_sub(self.position()?))
	}

	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]>;
	fn read_u8(&mut self) -> Result<u8> {
		Ok(u8::from_be_bytes(self.read_n().context("couldn't read u8, perhaps the data's end is reached?")?))
	}
	fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_be_bytes(self.read_n().context("couldn't read u16, perhaps the data's end is reached?")?))
	}
	fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_be_bytes(self.read_n().context("couldn't read u32, perhaps the data's end is reached?")?))
	}

	fn read_u8_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u8()? as usize)
	}
	fn read_u16_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u16()? as usize)
	}
	fn read_u32_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u32()? as usize)
	}

	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>>;

	fn read_vec<T, S, E>(&mut self, get_size: S, mut get_element: E) -> Result<Vec<T>>
	where
		S: FnOnce(&mut Self) -> Result<usize>,
		E: FnMut(&mut Self) -> Result<T>,
	{
		let size = get_size(self)?;
		let mut vec = Vec::with_capacity(size);
		for _ in 0..size {
			vec.push(get_element(self)?);
		}
		Ok(vec)
	}
}

impl<T: Read + Seek> AttrRead for T {
	fn skip(&mut self, n: i64) -> Result<()> {
		self.seek(SeekFrom::Current(n))?;
		Ok(())
	}

	fn position(&mut self) -> Result<u64> {
		Ok(self.stream_position()?)
	}

	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0u8; N];
		self.read_exact(&mut buf)?;
		Ok(buf)
	}

	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>> {
		let mut vec = std::vec::from_elem(0, size);
		self.read_exact(&mut vec)?;
		Ok(vec)
	}
}

#[cfg(test)]
mod testing {
	use std::io::Cursor;
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use super::AttrRead;

	#[test]
	fn remaining_tracks_declared_length() -> Result<()> {
		let mut reader = Cursor::new(vec![0u8; 16]);

		reader.skip(4)?;
		let content_start = AttrRead::position(&mut reader)?;

		assert_eq!(reader.remaining(content_start, 8)?, 8);
		reader.read_u16()?;
		assert_eq!(reader.remaining(content_start, 8)?, 6);
		reader.skip(6)?;
		assert_eq!(reader.remaining(content_start, 8)?, 0);

		// past the declared end it stays zero, never wraps
		reader.read_u8()?;
		assert_eq!(reader.remaining(content_start, 8)?, 0);

		Ok(())
	}
}
