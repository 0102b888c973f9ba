//! Host identity for remixer items.
//!
//! Hosts (typically UI screens) are not owned by the items they create. Each
//! host is attached to a [`HostTable`], which hands out a [`HostHandle`]: a
//! generational [`HostId`] plus a non-owning pointer back to the table. When the
//! host is torn down it is detached from the table, bumping the slot generation
//! so every outstanding handle stops resolving.
//!
//! # Generational Host IDs
//!
//! Detached slots are reused for later hosts. A handle only resolves while its
//! generation matches the slot, so a recreated host never inherits the identity
//! of the one it replaced. A slot whose generation reaches `u32::MAX` is retired
//! instead of wrapping.
//!
//! Ids are only meaningful within the table that issued them. Compare hosts
//! through [`HostHandle::same_host`], which also checks the table.

use std::any::TypeId;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};


/// Generational index of a host in a [`HostTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostId {
	/// The slot index in the host table.
	pub(crate) idx: u32,
	/// Generation counter for detecting stale references.
	pub(crate) generation: u32,
}

impl HostId {
	pub(crate) fn new(idx: u32, generation: u32) -> Self {
		Self { idx, generation }
	}

	/// Returns the slot index.
	pub fn index(&self) -> usize {
		self.idx as usize
	}

	/// Returns the slot generation this id was issued for.
	pub fn generation(&self) -> u32 {
		self.generation
	}
}

impl fmt::Display for HostId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}v{}", self.idx, self.generation)
	}
}

/// Snapshot of a host's concrete type.
///
/// Captured when the host is attached and copied into every item it creates,
/// so type comparisons keep working after the host itself is gone.
#[derive(Debug, Clone, Copy)]
pub struct HostType {
	id: TypeId,
	name: &'static str,
}

impl HostType {
	/// Returns the type snapshot for `H`.
	pub fn of<H: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<H>(),
			name: std::any::type_name::<H>(),
		}
	}

	/// Returns the type name, for diagnostics only.
	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for HostType {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for HostType {}

impl fmt::Display for HostType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// A slot in the host table with generational tracking.
struct HostSlot {
	/// Incremented each time the slot is freed.
	generation: u32,
	/// Type of the host currently occupying the slot, if any.
	host_type: Option<HostType>,
}

#[derive(Default)]
struct Slots {
	slots: Vec<HostSlot>,
	free: Vec<u32>,
}

impl Slots {
	fn resolve(&self, id: HostId) -> Option<&HostSlot> {
		let slot = self.slots.get(id.index())?;
		(slot.generation == id.generation && slot.host_type.is_some()).then_some(slot)
	}
}

/// Arena of live hosts.
///
/// The table is the single owner of host liveness. Items only hold
/// [`HostHandle`]s, which never keep the table (or a host) alive.
#[derive(Default)]
pub struct HostTable {
	inner: Rc<RefCell<Slots>>,
}

impl HostTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Attaches a new host of type `H`, returning its handle.
	///
	/// Reuses a freed slot when one is available.
	pub fn attach<H: ?Sized + 'static>(&self) -> HostHandle {
		let host_type = HostType::of::<H>();
		let mut inner = self.inner.borrow_mut();
		let reused = inner.free.pop();
		let id = match reused {
			Some(idx) => {
				let slot = &mut inner.slots[idx as usize];
				slot.host_type = Some(host_type);
				HostId::new(idx, slot.generation)
			}
			None => {
				// A table holds at most `u32::MAX` slots.
				let idx = u32::try_from(inner.slots.len()).unwrap_or(u32::MAX);
				inner.slots.push(HostSlot {
					generation: 0,
					host_type: Some(host_type),
				});
				HostId::new(idx, 0)
			}
		};
		tracing::debug!(host = %id, host_type = %host_type, "host attached");

		HostHandle {
			id,
			host_type,
			table: Rc::downgrade(&self.inner),
		}
	}

	/// Detaches a host, invalidating every handle that refers to it.
	///
	/// Returns `false` if `id` was already stale.
	pub fn detach(&self, id: HostId) -> bool {
		let mut inner = self.inner.borrow_mut();
		if inner.resolve(id).is_none() {
			return false;
		}
		let slot = &mut inner.slots[id.index()];
		slot.host_type = None;
		match slot.generation.checked_add(1) {
			Some(next) => {
				slot.generation = next;
				inner.free.push(id.idx);
				tracing::debug!(host = %id, "host detached");
			}
			None => tracing::debug!(host = %id, "host detached, slot retired"),
		}
		true
	}

	/// Returns `true` if `id` still refers to an attached host.
	pub fn is_live(&self, id: HostId) -> bool {
		self.inner.borrow().resolve(id).is_some()
	}

	/// Returns the type of the attached host, or `None` if `id` is stale.
	pub fn host_type(&self, id: HostId) -> Option<HostType> {
		self.inner.borrow().resolve(id).and_then(|slot| slot.host_type)
	}

	/// Returns the number of attached hosts.
	pub fn len(&self) -> usize {
		self.inner
			.borrow()
			.slots
			.iter()
			.filter(|slot| slot.host_type.is_some())
			.count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Non-owning reference to a host in a [`HostTable`].
///
/// Resolving a handle is a point-in-time check: the host may be detached
/// right after a successful lookup.
#[derive(Clone)]
pub struct HostHandle {
	id: HostId,
	host_type: HostType,
	table: Weak<RefCell<Slots>>,
}

impl HostHandle {
	pub fn id(&self) -> HostId {
		self.id
	}

	/// Type captured when the host was attached. Valid after detachment.
	pub fn host_type(&self) -> HostType {
		self.host_type
	}

	/// Returns `true` if both handles were issued for the same host by the
	/// same table.
	pub fn same_host(&self, other: &HostHandle) -> bool {
		self.id == other.id && Weak::ptr_eq(&self.table, &other.table)
	}

	/// Returns `true` while the table exists and the host is still attached.
	pub fn is_live(&self) -> bool {
		self.table
			.upgrade()
			.is_some_and(|table| table.borrow().resolve(self.id).is_some())
	}
}

impl fmt::Debug for HostHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HostHandle")
			.field("id", &self.id)
			.field("host_type", &self.host_type.name)
			.finish()
	}
}

/// An object that can own remixer items.
pub trait Host {
	fn host_handle(&self) -> &HostHandle;
}

impl Host for HostHandle {
	fn host_handle(&self) -> &HostHandle {
		self
	}
}
