//! The `Module` attribute and its normalized descriptor.
//!
//! Decoding keeps what's on the wire (internal `/`-separated names, raw
//! flag words); [`ModuleAttribute::descriptor`] then builds the external
//! shape with `.`-separated names and named flags.

use anyhow::Result;
use crate::AttrRead;
use crate::pool::ConstantPool;

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleAttribute {
	pub name: String,
	pub flags: u16,
	pub version: Option<String>,
	pub requires: Vec<ModuleRequires>,
	pub exports: Vec<ModuleExports>,
	pub opens: Vec<ModuleOpens>,
	pub uses: Vec<String>,
	pub provides: Vec<ModuleProvides>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRequires {
	pub name: String,
	pub flags: u16,
	pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleExports {
	pub package: String,
	pub flags: u16,
	pub exports_to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleOpens {
	pub package: String,
	pub flags: u16,
	pub opens_to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleProvides {
	pub interface: String,
	pub provides_with: Vec<String>,
}

impl ModuleAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<ModuleAttribute> {
		Ok(ModuleAttribute {
			name: pool.module_name(reader.read_u16()?)?,
			flags: reader.read_u16()?,
			version: pool.optional(reader.read_u16()?, ConstantPool::utf8)?,
			requires: reader.read_vec(
				|r| r.read_u16_as_usize(),
				|r| Ok(ModuleRequires {
					name: pool.module_name(r.read_u16()?)?,
					flags: r.read_u16()?,
					version: pool.optional(r.read_u16()?, ConstantPool::utf8)?,
				})
			)?,
			exports: reader.read_vec(
				|r| r.read_u16_as_usize(),
				|r| Ok(ModuleExports {
					package: pool.package_name(r.read_u16()?)?,
					flags: r.read_u16()?,
					exports_to: r.read_vec(
						|r| r.read_u16_as_usize(),
						|r| pool.module_name(r.read_u16()?)
					)?,
				})
			)?,
			opens: reader.read_vec(
				|r| r.read_u16_as_usize(),
				|r| Ok(ModuleOpens {
					package: pool.package_name(r.read_u16()?)?,
					flags: r.read_u16()?,
					opens_to: r.read_vec(
						|r| r.read_u16_as_usize(),
						|r| pool.module_name(r.read_u16()?)
					)?,
				})
			)?,
			uses: reader.read_vec(
				|r| r.read_u16_as_usize(),
				|r| pool.class_name(r.read_u16()?)
			)?,
			provides: reader.read_vec(
				|r| r.read_u16_as_usize(),
				|r| Ok(ModuleProvides {
					interface: pool.class_name(r.read_u16()?)?,
					provides_with: r.read_vec(
						|r| r.read_u16_as_usize(),
						|r| pool.class_name(r.read_u16()?)
					)?,
				})
			)?,
		})
	}

	/// Builds the normalized descriptor: every internal name becomes a
	/// `.`-separated external name, every flag word becomes named booleans.
	/// Pure; can be called any number of times.
	pub fn descriptor(&self) -> ModuleDescriptor {
		ModuleDescriptor {
			name: external_name(&self.name),
			flags: self.flags.into(),
			version: self.version.clone(),
			requires: self.requires.iter()
				.map(|r| RequiresDescriptor {
					name: external_name(&r.name),
					flags: r.flags.into(),
					version: r.version.clone(),
				})
				.collect(),
			exports: self.exports.iter()
				.map(|e| PackageDescriptor {
					package: external_name(&e.package),
					flags: e.flags.into(),
					targets: e.exports_to.iter().map(|t| external_name(t)).collect(),
				})
				.collect(),
			opens: self.opens.iter()
				.map(|o| PackageDescriptor {
					package: external_name(&o.package),
					flags: o.flags.into(),
					targets: o.opens_to.iter().map(|t| external_name(t)).collect(),
				})
				.collect(),
			uses: self.uses.iter().map(|u| external_name(u)).collect(),
			provides: self.provides.iter()
				.map(|p| ProvidesDescriptor {
					interface: external_name(&p.interface),
					implementations: p.provides_with.iter().map(|i| external_name(i)).collect(),
				})
				.collect(),
		}
	}
}

fn external_name(internal: &str) -> String {
	internal.replace('/', ".")
}

/// The normalized module descriptor, the one stable external shape built
/// from the decoded sub-tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDescriptor {
	pub name: String,
	pub flags: ModuleFlags,
	pub version: Option<String>,
	pub requires: Vec<RequiresDescriptor>,
	pub exports: Vec<PackageDescriptor>,
	pub opens: Vec<PackageDescriptor>,
	pub uses: Vec<String>,
	pub provides: Vec<ProvidesDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequiresDescriptor {
	pub name: String,
	pub flags: RequiresFlags,
	pub version: Option<String>,
}

/// Shared by `exports` and `opens`; they have the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
	pub package: String,
	pub flags: PackageFlags,
	pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProvidesDescriptor {
	pub interface: String,
	pub implementations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModuleFlags {
	pub is_open: bool,
	pub is_synthetic: bool,
	pub is_mandated: bool,
}

impl From<u16> for ModuleFlags {
	fn from(value: u16) -> Self {
		ModuleFlags {
			is_open:      value & 0x0020 != 0,
			is_synthetic: value & 0x1000 != 0,
			is_mandated:  value & 0x8000 != 0,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RequiresFlags {
	pub is_transitive: bool,
	pub is_static_phase: bool,
	pub is_synthetic: bool,
	pub is_mandated: bool,
}

impl From<u16> for RequiresFlags {
	fn from(value: u16) -> Self {
		RequiresFlags {
			is_transitive:   value & 0x0020 != 0,
			is_static_phase: value & 0x0040 != 0,
			is_synthetic:    value & 0x1000 != 0,
			is_mandated:     value & 0x8000 != 0,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PackageFlags {
	pub is_synthetic: bool,
	pub is_mandated: bool,
}

impl From<u16> for PackageFlags {
	fn from(value: u16) -> Self {
		PackageFlags {
			is_synthetic: value & 0x1000 != 0,
			is_mandated:  value & 0x8000 != 0,
		}
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn requires_flag_decode() {
		// only the transitive bit set, nothing else may come out
		let flags = RequiresFlags::from(0x0020);
		assert_eq!(flags, RequiresFlags {
			is_transitive: true,
			is_static_phase: false,
			is_synthetic: false,
			is_mandated: false,
		});

		let flags = RequiresFlags::from(0x8040);
		assert!(flags.is_static_phase && flags.is_mandated);
		assert!(!flags.is_transitive && !flags.is_synthetic);
	}

	#[test]
	fn module_flag_decode() {
		assert!(ModuleFlags::from(0x0020).is_open);
		assert!(!ModuleFlags::from(0x0020).is_synthetic);
		assert!(ModuleFlags::from(0x1000).is_synthetic);
		assert!(ModuleFlags::from(0x8000).is_mandated);
	}

	#[test]
	fn descriptor_uses_external_names() {
		let attribute = ModuleAttribute {
			name: "com/example/app".to_owned(),
			flags: 0x0020,
			version: Some("1.0".to_owned()),
			requires: vec![ModuleRequires {
				name: "java/base".to_owned(),
				flags: 0x8000,
				version: None,
			}],
			exports: vec![ModuleExports {
				package: "com/example/api".to_owned(),
				flags: 0,
				exports_to: vec!["com/example/other".to_owned()],
			}],
			opens: Vec::new(),
			uses: vec!["com/example/spi/Service".to_owned()],
			provides: vec![ModuleProvides {
				interface: "com/example/spi/Service".to_owned(),
				provides_with: vec!["com/example/impl/ServiceImpl".to_owned()],
			}],
		};

		let descriptor = attribute.descriptor();
		assert_eq!(descriptor.name, "com.example.app");
		assert!(descriptor.flags.is_open);
		assert_eq!(descriptor.requires[0].name, "java.base");
		assert!(descriptor.requires[0].flags.is_mandated);
		assert_eq!(descriptor.exports[0].package, "com.example.api");
		assert_eq!(descriptor.exports[0].targets, vec!["com.example.other".to_owned()]);
		assert_eq!(descriptor.uses, vec!["com.example.spi.Service".to_owned()]);
		assert_eq!(descriptor.provides[0].implementations, vec!["com.example.impl.ServiceImpl".to_owned()]);
	}
}
