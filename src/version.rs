//! Class file versions.

use std::cmp::Ordering;

/// Represents a class file version.
///
/// Take a look at [the list of class file versions](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.1-200-B.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
	pub major: u16,
	pub minor: u16,
}

impl Version {
	#[allow(unused)]
	pub const V1_1: Version = Version::new(45, 3);
	#[allow(unused)]
	pub const V1_5: Version = Version::new(49, 0);
	#[allow(unused)]
	pub const V1_8: Version = Version::new(52, 0);
	#[allow(unused)]
	pub const V9: Version = Version::new(53, 0);
	#[allow(unused)]
	pub const V17: Version = Version::new(61, 0);
	#[allow(unused)]
	pub const V21: Version = Version::new(65, 0);

	pub const fn new(major: u16, minor: u16) -> Version {
		Version { major, minor }
	}

	/// Whether the `Code` attribute of this version uses the ancient layout
	/// with `u8` max stack/locals and a `u16` code length.
	///
	/// Only class files older than 45.3 (that's pre JDK 1.1) do.
	pub fn has_legacy_code_layout(self) -> bool {
		self < Version::V1_1
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> Ordering {
		self.major.cmp(&other.major)
			.then_with(|| self.minor.cmp(&other.minor))
	}
}

#[cfg(test)]
mod testing {
	use crate::version::Version;

	#[test]
	fn test_cmp() {
		assert!(Version::V9 < Version::V17);
		assert!(Version::V1_1 < Version::V1_5);
		assert!(Version::new(65, 2) > Version::new(65, 1));
	}

	#[test]
	fn legacy_code_layout() {
		assert!(Version::new(45, 0).has_legacy_code_layout());
		assert!(Version::new(45, 2).has_legacy_code_layout());
		assert!(!Version::V1_1.has_legacy_code_layout());
		assert!(!Version::V1_8.has_legacy_code_layout());
		assert!(!Version::V21.has_legacy_code_layout());
	}
}
