//! The `LocalVariableTable` and `LocalVariableTypeTable` attributes.
//!
//! A slot index can be reused by several source variables over disjoint
//! bytecode ranges. To keep those apart, every entry gets a *version*: a
//! counter per slot, assigned in start-offset order. Versions are recomputed
//! from scratch whenever entries change (decode, [`LocalVariableTableAttribute::merge`]),
//! never accumulated across calls.

use std::collections::HashMap;
use anyhow::Result;
use crate::AttrRead;
use crate::pool::ConstantPool;

/// The ordering key shared by sorting, searching and the type-table join:
/// `(slot, start, length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalVariableKey {
	pub index: u16,
	pub start: u16,
	pub length: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariable {
	pub start: u16,
	pub length: u16,
	pub name: String,
	pub descriptor: String,
	/// The local variable slot this variable lives in.
	pub index: u16,
	/// Filled in from a `LocalVariableTypeTable` entry with the same key,
	/// if there is one.
	pub signature: Option<String>,
	/// Distinguishes successive reuses of the same slot; starts at `1` and
	/// strictly increases with the start offset per slot.
	pub version: u16,
}

impl LocalVariable {
	pub fn key(&self) -> LocalVariableKey {
		LocalVariableKey { index: self.index, start: self.start, length: self.length }
	}

	/// Whether the variable is in scope at the given bytecode offset.
	pub fn covers(&self, offset: u16) -> bool {
		(self.start..self.start.saturating_add(self.length)).contains(&offset)
	}
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalVariableTableAttribute {
	entries: Vec<LocalVariable>,
}

impl LocalVariableTableAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<LocalVariableTableAttribute> {
		let entries = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| {
				let start = r.read_u16()?;
				let length = r.read_u16()?;
				let name = pool.utf8(r.read_u16()?)?;
				let descriptor = pool.utf8(r.read_u16()?)?;
				let index = r.read_u16()?;
				Ok(LocalVariable { start, length, name, descriptor, index, signature: None, version: 0 })
			}
		)?;

		let mut table = LocalVariableTableAttribute { entries };
		table.sort_and_version();
		Ok(table)
	}

	/// Appends the other table's entries and recomputes order and versions
	/// over the union. Compilers emit several `LocalVariableTable`
	/// attributes for one method when its body is split (e.g. around
	/// exception handlers); they describe one logical table.
	///
	/// Versions are recomputed, not accumulated: merging overlapping input
	/// more than once renumbers everything from scratch each time.
	pub fn merge(&mut self, other: &LocalVariableTableAttribute) {
		self.entries.extend(other.entries.iter().cloned());
		self.sort_and_version();
	}

	fn sort_and_version(&mut self) {
		self.entries.sort_by_key(LocalVariable::key);

		let mut counters: HashMap<u16, u16> = HashMap::new();
		for entry in &mut self.entries {
			let counter = counters.entry(entry.index).or_insert(0);
			*counter += 1;
			entry.version = *counter;
		}
	}

	/// Splices the generic signatures of a `LocalVariableTypeTable` onto
	/// this table: each type entry goes to the first entry here with the
	/// same `(slot, start, length)` key. Type entries with no match are
	/// silently dropped; the type table never stands on its own.
	pub fn merge_signatures(&mut self, types: &LocalVariableTypeTableAttribute) {
		for ty in &types.entries {
			if let Some(entry) = self.entries.iter_mut().find(|e| e.key() == ty.key()) {
				entry.signature = Some(ty.signature.clone());
			}
		}
	}

	pub fn entries(&self) -> &[LocalVariable] {
		&self.entries
	}

	/// The name of the variable in `index` that is in scope at `offset`.
	///
	/// If entries overlap (they shouldn't, but nothing deduplicates them),
	/// the first in table order wins.
	pub fn name(&self, index: u16, offset: u16) -> Option<&str> {
		self.find(index, offset).map(|e| e.name.as_str())
	}

	/// Like [`Self::name`], for the descriptor.
	pub fn descriptor(&self, index: u16, offset: u16) -> Option<&str> {
		self.find(index, offset).map(|e| e.descriptor.as_str())
	}

	fn find(&self, index: u16, offset: u16) -> Option<&LocalVariable> {
		self.entries.iter().find(|e| e.index == index && e.covers(offset))
	}

	/// All versions of the given slot.
	pub fn versions_of(&self, index: u16) -> impl Iterator<Item = &LocalVariable> {
		self.entries.iter().filter(move |e| e.index == index)
	}

	/// All entries whose scope intersects the inclusive offset range
	/// `start..=end` (e.g. the instruction offsets of one statement).
	pub fn in_range(&self, start: u16, end: u16) -> impl Iterator<Item = &LocalVariable> {
		self.entries.iter().filter(move |e| {
			e.start <= end && start < e.start.saturating_add(e.length)
		})
	}

	/// Whether any variable in the table has this name.
	pub fn contains_name(&self, name: &str) -> bool {
		self.entries.iter().any(|e| e.name == name)
	}
}

/// Same wire shape as the primary table, but the descriptor slot holds a
/// generic signature instead.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableType {
	pub start: u16,
	pub length: u16,
	pub name: String,
	pub signature: String,
	pub index: u16,
}

impl LocalVariableType {
	pub fn key(&self) -> LocalVariableKey {
		LocalVariableKey { index: self.index, start: self.start, length: self.length }
	}
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalVariableTypeTableAttribute {
	entries: Vec<LocalVariableType>,
}

impl LocalVariableTypeTableAttribute {
	pub(crate) fn decode(reader: &mut impl AttrRead, pool: &impl ConstantPool) -> Result<LocalVariableTypeTableAttribute> {
		let entries = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| {
				let start = r.read_u16()?;
				let length = r.read_u16()?;
				let name = pool.utf8(r.read_u16()?)?;
				let signature = pool.utf8(r.read_u16()?)?;
				let index = r.read_u16()?;
				Ok(LocalVariableType { start, length, name, signature, index })
			}
		)?;
		Ok(LocalVariableTypeTableAttribute { entries })
	}

	/// Same split-body situation as with the primary table.
	pub fn merge(&mut self, other: &LocalVariableTypeTableAttribute) {
		self.entries.extend(other.entries.iter().cloned());
		self.entries.sort_by_key(LocalVariableType::key);
	}

	pub fn entries(&self) -> &[LocalVariableType] {
		&self.entries
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	fn var(index: u16, start: u16, length: u16, name: &str, descriptor: &str) -> LocalVariable {
		LocalVariable {
			start,
			length,
			name: name.to_owned(),
			descriptor: descriptor.to_owned(),
			index,
			signature: None,
			version: 0,
		}
	}

	fn table(entries: Vec<LocalVariable>) -> LocalVariableTableAttribute {
		let mut table = LocalVariableTableAttribute { entries };
		table.sort_and_version();
		table
	}

	#[test]
	fn versioning_is_per_slot_in_start_order() {
		let table = table(vec![
			var(3, 10, 5, "b", "I"),
			var(3, 0, 5, "a", "I"),
			var(1, 0, 20, "this", "Ljava/lang/Object;"),
		]);

		let slot_3: Vec<_> = table.versions_of(3).collect();
		assert_eq!(slot_3.len(), 2);
		assert_eq!((slot_3[0].start, slot_3[0].version), (0, 1));
		assert_eq!((slot_3[1].start, slot_3[1].version), (10, 2));

		let slot_1: Vec<_> = table.versions_of(1).collect();
		assert_eq!(slot_1[0].version, 1);
	}

	#[test]
	fn merge_recomputes_versions() {
		let mut table = table(vec![
			var(3, 0, 5, "a", "I"),
			var(3, 10, 5, "b", "I"),
		]);
		let copy = table.clone();

		// merging a table with itself renumbers over the union
		table.merge(&copy);

		assert_eq!(table.entries().len(), 4);
		for pair in table.versions_of(3).collect::<Vec<_>>().windows(2) {
			assert!(pair[0].version < pair[1].version);
			assert!(pair[0].start <= pair[1].start);
		}
		let versions: Vec<_> = table.versions_of(3).map(|e| e.version).collect();
		assert_eq!(versions, vec![1, 2, 3, 4]);
	}

	#[test]
	fn signature_splice() {
		let mut table = table(vec![
			var(2, 0, 8, "list", "Ljava/util/List;"),
			var(2, 8, 8, "other", "Ljava/util/List;"),
		]);

		let types = LocalVariableTypeTableAttribute {
			entries: vec![
				LocalVariableType {
					start: 0,
					length: 8,
					name: "list".to_owned(),
					signature: "Ljava/util/List<Ljava/lang/String;>;".to_owned(),
					index: 2,
				},
				// no matching primary entry, must be dropped without error
				LocalVariableType {
					start: 100,
					length: 4,
					name: "ghost".to_owned(),
					signature: "TT;".to_owned(),
					index: 9,
				},
			],
		};

		table.merge_signatures(&types);

		assert_eq!(table.entries()[0].signature.as_deref(), Some("Ljava/util/List<Ljava/lang/String;>;"));
		assert_eq!(table.entries()[1].signature, None);
	}

	#[test]
	fn scope_queries() {
		let table = table(vec![
			var(3, 0, 10, "a", "I"),
			var(3, 10, 5, "b", "J"),
		]);

		assert_eq!(table.name(3, 0), Some("a"));
		assert_eq!(table.name(3, 9), Some("a"));
		assert_eq!(table.name(3, 10), Some("b"));
		assert_eq!(table.descriptor(3, 12), Some("J"));
		assert_eq!(table.name(3, 15), None);
		assert_eq!(table.name(4, 0), None);

		let hits: Vec<_> = table.in_range(8, 11).map(|e| e.name.as_str()).collect();
		assert_eq!(hits, vec!["a", "b"]);

		assert!(table.contains_name("b"));
		assert!(!table.contains_name("c"));
	}
}
