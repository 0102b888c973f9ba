//! Remixer items: identity, ownership tracking, and the compatibility protocol.
//!
//! # Role
//!
//! Every concrete item kind (variables, triggers) embeds an [`ItemCore`] and
//! implements [`RemixerItem`]. The core holds the immutable identity of the
//! item, a non-owning [`HostHandle`] to the host that created it, and the
//! host's type captured at construction. Identity questions are answered from
//! the core alone; they never require the host to still be alive.
//!
//! # Lifecycle
//!
//! See [`ItemState`]. Orphaning is detected lazily through
//! [`RemixerItem::has_live_owner`]. Clearing happens through
//! [`RemixerItem::clear_callback`], either called directly or by the registry
//! at host teardown.

use std::any::Any;
use std::fmt;
use std::rc::Weak;

use crate::error::{IncompatibleItems, ItemError, Mismatch};
use crate::host::{Host, HostHandle, HostId, HostTable, HostType};
use crate::registry::ItemRegistry;


/// Layout hint meaning "use the default layout for this item's kind".
pub const DEFAULT_LAYOUT: i32 = 0;

/// Concrete kind of a remixer item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
	Variable,
	Trigger,
	/// A kind defined outside this crate.
	Custom(&'static str),
}

impl fmt::Display for ItemKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Variable => f.write_str("variable"),
			Self::Trigger => f.write_str("trigger"),
			Self::Custom(name) => f.write_str(name),
		}
	}
}

/// Observable lifecycle state of an item.
///
/// `Discarded` is not represented: once the registry drops an item there is
/// nothing left to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
	/// Owner is live, no registry attached yet.
	Constructed,
	/// Owner is live and a registry has been attached.
	Attached,
	/// Owner is gone; the callback has not been released.
	Orphaned,
	/// The callback has been released.
	Cleared,
}

/// Identity and ownership state shared by every item kind.
pub struct ItemCore {
	title: String,
	key: String,
	layout_hint: i32,
	owner: Option<HostHandle>,
	owner_type: HostType,
	registry: Option<Weak<dyn ItemRegistry>>,
	released: bool,
}

impl ItemCore {
	/// Creates the core of an item owned by `owner`.
	///
	/// # Errors
	///
	/// Returns [`ItemError::InvalidArgument`] if `key` is empty or `owner` has
	/// already been detached from its host table.
	pub fn new(
		title: impl Into<String>,
		key: impl Into<String>,
		owner: &dyn Host,
		layout_hint: i32,
	) -> Result<Self, ItemError> {
		let key = key.into();
		if key.is_empty() {
			return Err(ItemError::InvalidArgument(
				"remixer item key must not be empty".into(),
			));
		}
		let handle = owner.host_handle();
		if !handle.is_live() {
			return Err(ItemError::InvalidArgument(format!(
				"owner of {key:?} is no longer attached"
			)));
		}

		Ok(Self {
			title: title.into(),
			key,
			layout_hint,
			owner_type: handle.host_type(),
			owner: Some(handle.clone()),
			registry: None,
			released: false,
		})
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	/// Raw layout hint; [`DEFAULT_LAYOUT`] means the kind's default.
	pub fn layout_hint(&self) -> i32 {
		self.layout_hint
	}

	/// Returns the layout hint, substituting `kind_default` for [`DEFAULT_LAYOUT`].
	pub fn resolve_layout(&self, kind_default: i32) -> i32 {
		if self.layout_hint == DEFAULT_LAYOUT {
			kind_default
		} else {
			self.layout_hint
		}
	}

	/// Type of the host that created this item, fixed at construction.
	pub fn owner_type(&self) -> HostType {
		self.owner_type
	}

	/// Resolves the owner reference. Registry use only.
	pub(crate) fn owner(&self) -> Option<&HostHandle> {
		self.owner.as_ref().filter(|handle| handle.is_live())
	}

	/// Handle the owner was issued, whether or not it is still attached.
	pub(crate) fn owner_handle(&self) -> Option<&HostHandle> {
		self.owner.as_ref()
	}

	/// Returns `true` if `candidate` is exactly the (still live) owner.
	pub fn is_owned_by(&self, candidate: Option<&dyn Host>) -> bool {
		let Some(candidate) = candidate else {
			return false;
		};
		self.owner()
			.is_some_and(|owner| owner.same_host(candidate.host_handle()))
	}

	/// Returns `true` if the owner is still attached.
	///
	/// The answer is only valid at the time of the call.
	pub fn has_live_owner(&self) -> bool {
		self.owner().is_some()
	}

	/// Compares `candidate`'s type against the captured owner type.
	pub fn is_same_owner_type_as(&self, candidate: &dyn Host) -> bool {
		self.is_same_owner_type(candidate.host_handle().host_type())
	}

	pub fn is_same_owner_type(&self, host_type: HostType) -> bool {
		self.owner_type == host_type
	}

	/// Compares the type of the host at `candidate` against the owner type.
	///
	/// # Errors
	///
	/// Returns [`ItemError::InvalidArgument`] if `candidate` does not resolve
	/// in `hosts`, since there is no type to compare against.
	pub fn is_same_owner_type_as_id(
		&self,
		hosts: &HostTable,
		candidate: HostId,
	) -> Result<bool, ItemError> {
		let host_type = hosts.host_type(candidate).ok_or_else(|| {
			ItemError::InvalidArgument(format!("host {candidate} is not attached"))
		})?;
		Ok(self.is_same_owner_type(host_type))
	}

	/// Drops the owner reference as if the owner had been reclaimed.
	///
	/// Only meant for tests and simulations.
	pub fn simulate_owner_reclaimed(&mut self) {
		self.owner = None;
	}

	/// Attaches this item to `registry`. Last write wins.
	pub fn set_registry(&mut self, registry: Weak<dyn ItemRegistry>) {
		self.registry = Some(registry);
	}

	pub fn is_attached(&self) -> bool {
		self.registry.is_some()
	}

	/// Asks the attached registry to notify other items sharing this key.
	///
	/// Returns `false` if no registry is attached or it has been dropped.
	pub fn notify_changed(&self) -> bool {
		match self.registry.as_ref().and_then(Weak::upgrade) {
			Some(registry) => {
				registry.notify_key_changed(&self.key);
				true
			}
			None => false,
		}
	}

	pub(crate) fn mark_released(&mut self) {
		self.released = true;
	}

	pub fn state(&self) -> ItemState {
		if self.released {
			ItemState::Cleared
		} else if !self.has_live_owner() {
			ItemState::Orphaned
		} else if self.is_attached() {
			ItemState::Attached
		} else {
			ItemState::Constructed
		}
	}
}

impl fmt::Debug for ItemCore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ItemCore")
			.field("title", &self.title)
			.field("key", &self.key)
			.field("layout_hint", &self.layout_hint)
			.field("owner", &self.owner)
			.field("owner_type", &self.owner_type.name())
			.field("attached", &self.is_attached())
			.field("released", &self.released)
			.finish()
	}
}

/// A tunable item a host exposes for live adjustment.
///
/// Implementors embed an [`ItemCore`] and supply the compatibility check and
/// callback clearing for their kind. Compatibility is not required to be
/// symmetric.
pub trait RemixerItem: Any {
	fn core(&self) -> &ItemCore;

	fn core_mut(&mut self) -> &mut ItemCore;

	fn kind(&self) -> ItemKind;

	/// Drops any callback held by the item. Must be idempotent.
	///
	/// Called by [`RemixerItem::clear_callback`]; use that instead so the
	/// item's state is recorded.
	fn drop_callback(&mut self);

	/// Checks whether `other`, which shares this item's key, is the same
	/// logical item.
	///
	/// # Errors
	///
	/// Returns [`IncompatibleItems`] naming the key and the mismatch when the
	/// kinds, value types, or constraints differ.
	fn check_compatible_with(&self, other: &dyn RemixerItem) -> Result<(), IncompatibleItems>;

	fn title(&self) -> &str {
		self.core().title()
	}

	fn key(&self) -> &str {
		self.core().key()
	}

	fn layout_hint(&self) -> i32 {
		self.core().layout_hint()
	}

	fn is_owned_by(&self, candidate: Option<&dyn Host>) -> bool {
		self.core().is_owned_by(candidate)
	}

	fn has_live_owner(&self) -> bool {
		self.core().has_live_owner()
	}

	fn is_same_owner_type_as(&self, candidate: &dyn Host) -> bool {
		self.core().is_same_owner_type_as(candidate)
	}

	fn state(&self) -> ItemState {
		self.core().state()
	}

	/// Drops the callback and records the item as [`ItemState::Cleared`].
	///
	/// Idempotent. Implementors customize [`RemixerItem::drop_callback`]
	/// rather than overriding this.
	fn clear_callback(&mut self) {
		self.drop_callback();
		self.core_mut().mark_released();
	}

	/// Name of the concrete item type, for diagnostics.
	fn type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

/// Downcasts `other` to `this`'s concrete type.
///
/// Intended as the first step of [`RemixerItem::check_compatible_with`].
///
/// # Errors
///
/// Returns a [`Mismatch::Kind`] error keyed on `this` when the kinds differ,
/// or a [`Mismatch::ValueType`] error when both share a kind but are
/// different Rust types (e.g. variables over different value types).
pub fn same_kind<'a, T: RemixerItem>(
	this: &T,
	other: &'a dyn RemixerItem,
) -> Result<&'a T, IncompatibleItems> {
	if this.kind() != other.kind() {
		return Err(IncompatibleItems::new(
			this.key(),
			Mismatch::Kind {
				expected: this.kind(),
				found: other.kind(),
			},
		));
	}
	let any: &dyn Any = other;
	any.downcast_ref::<T>().ok_or_else(|| {
		IncompatibleItems::new(
			this.key(),
			Mismatch::ValueType {
				expected: std::any::type_name::<T>(),
				found: other.type_name(),
			},
		)
	})
}
