//! The constant pool collaborator.
//!
//! This crate does not read or store the constant pool itself. Attribute
//! payloads are full of 1-based pool indices though, so every decoder takes
//! something implementing [`ConstantPool`] to turn indices into strings,
//! literals and links.

use anyhow::Result;

/// A symbolic link to a field or method: who declares it, what it's called,
/// and its descriptor. Method handles in `BootstrapMethods` resolve to this.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkConstant {
	pub class: String,
	pub name: String,
	pub descriptor: String,
}

/// A loadable constant pool value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
	Integer(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	String(String),
	Class(String),
	MethodHandle(LinkConstant),
	MethodType(String),
}

/// Resolves 1-based constant pool indices.
///
/// Index `0` is never valid here; attributes encode "absent" as index `0`
/// and decoders go through [`ConstantPool::optional`] for those fields.
///
/// Implementations must be safe for concurrent read-only access if class
/// files are decoded in parallel; nothing in this crate mutates the pool.
pub trait ConstantPool {
	/// Resolves a `CONSTANT_Utf8_info` entry.
	fn utf8(&self, index: u16) -> Result<String>;

	/// Resolves a `CONSTANT_Class_info` entry to its internal binary name,
	/// like `java/lang/Object`.
	fn class_name(&self, index: u16) -> Result<String>;

	/// Resolves a `CONSTANT_Module_info` entry to its name.
	fn module_name(&self, index: u16) -> Result<String>;

	/// Resolves a `CONSTANT_Package_info` entry to its name.
	fn package_name(&self, index: u16) -> Result<String>;

	/// Resolves a `CONSTANT_NameAndType_info` entry to `(name, descriptor)`.
	fn name_and_type(&self, index: u16) -> Result<(String, String)>;

	/// Resolves a `CONSTANT_MethodHandle_info` entry to the field or method
	/// it points at.
	fn link(&self, index: u16) -> Result<LinkConstant>;

	/// Resolves any loadable constant.
	fn constant(&self, index: u16) -> Result<Constant>;

	/// Treats index `0` as "not there", otherwise resolves with `f`.
	fn optional<T>(&self, index: u16, f: impl FnOnce(&Self, u16) -> Result<T>) -> Result<Option<T>>
	where
		Self: Sized,
	{
		if index == 0 {
			Ok(None)
		} else {
			Ok(Some(f(self, index)?))
		}
	}
}
