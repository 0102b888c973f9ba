//! Keyed aggregation of remixer items.
//!
//! # Role
//!
//! [`ItemRegistry`] is the back-reference items use to report state changes.
//! [`KeyedRegistry`] is a reference aggregator built on the item contract: it
//! groups items by key, refuses conflicting registrations, and retires items
//! whose hosts are gone.
//!
//! Items from different hosts may share a key as long as they are compatible;
//! a single live host may hold each key at most once.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::host::Host;
use crate::item::RemixerItem;


/// Receives change notifications from attached items.
pub trait ItemRegistry {
	/// Called when the item registered under `key` changed state.
	fn notify_key_changed(&self, key: &str);
}

/// Groups items by key and mediates same-key conflicts.
pub struct KeyedRegistry {
	config: RegistryConfig,
	items: RefCell<Vec<Box<dyn RemixerItem>>>,
	pending: RefCell<Vec<String>>,
	this: Weak<KeyedRegistry>,
}

impl KeyedRegistry {
	pub fn new(config: RegistryConfig) -> Rc<Self> {
		Rc::new_cyclic(|this| Self {
			config,
			items: RefCell::new(Vec::new()),
			pending: RefCell::new(Vec::new()),
			this: this.clone(),
		})
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Registers `item`, attaching it to this registry.
	///
	/// # Errors
	///
	/// - [`RegistryError::DuplicateKey`] if the item's live owner already
	///   registered an item under the same key.
	/// - [`RegistryError::Incompatible`] if any registered item with the same
	///   key is not compatible with `item`.
	///
	/// The item is dropped on error.
	pub fn register(&self, mut item: Box<dyn RemixerItem>) -> Result<(), RegistryError> {
		if self.config.prune_on_register {
			self.prune_orphans();
		}

		let mut items = self.items.borrow_mut();
		let owner = item.core().owner();
		for existing in items.iter().filter(|existing| existing.key() == item.key()) {
			if let Some(host) = owner
				&& existing.core().owner().is_some_and(|other| other.same_host(host))
			{
				tracing::warn!(key = %item.key(), host = %host.id(), "duplicate key for live host");
				return Err(RegistryError::DuplicateKey {
					key: item.key().to_string(),
					host: host.id().to_string(),
				});
			}

			let checked = item.check_compatible_with(&**existing).and_then(|()| {
				if self.config.symmetric_checks {
					existing.check_compatible_with(&*item)
				} else {
					Ok(())
				}
			});
			if let Err(err) = checked {
				tracing::warn!(key = %err.key, mismatch = %err.mismatch, "incompatible registration refused");
				return Err(err.into());
			}
		}

		let owner = owner.map(|host| host.id());
		let registry: Weak<dyn ItemRegistry> = self.this.clone();
		item.core_mut().set_registry(registry);
		tracing::debug!(key = %item.key(), kind = %item.kind(), owner = ?owner, "item registered");
		items.push(item);
		Ok(())
	}

	/// Releases and discards every item whose owner is gone.
	///
	/// Returns the number of discarded items.
	pub fn prune_orphans(&self) -> usize {
		let mut items = self.items.borrow_mut();
		let before = items.len();
		items.retain_mut(|item| {
			if item.has_live_owner() {
				return true;
			}
			item.clear_callback();
			false
		});
		let pruned = before - items.len();
		if pruned > 0 {
			tracing::debug!(pruned, "orphaned items discarded");
		}
		pruned
	}

	/// Releases the callbacks of every item created by `host`.
	///
	/// Works whether or not `host` has already been detached from its table.
	/// With [`RegistryConfig::discard_on_teardown`] the items are also
	/// discarded. Returns the number of affected items.
	pub fn on_host_destroyed(&self, host: &dyn Host) -> usize {
		let host = host.host_handle();
		let issued_by = |item: &dyn RemixerItem| {
			item.core()
				.owner_handle()
				.is_some_and(|owner| owner.same_host(host))
		};
		let mut items = self.items.borrow_mut();
		let mut released = 0;
		for item in items.iter_mut().filter(|item| issued_by(&***item)) {
			item.clear_callback();
			released += 1;
		}
		if self.config.discard_on_teardown {
			items.retain(|item| !issued_by(&**item));
		}
		tracing::debug!(host = %host.id(), released, "host torn down");
		released
	}

	/// Keys of orphaned items whose former owner had the same type as `host`.
	///
	/// A new host of that type is typically the same screen being recreated.
	pub fn resumable_keys(&self, host: &dyn Host) -> Vec<String> {
		let mut keys: Vec<String> = Vec::new();
		for item in self.items.borrow().iter() {
			if !item.has_live_owner()
				&& item.is_same_owner_type_as(host)
				&& !keys.iter().any(|k| k == item.key())
			{
				keys.push(item.key().to_string());
			}
		}
		keys
	}

	pub fn len(&self) -> usize {
		self.items.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.borrow().is_empty()
	}

	/// Distinct keys in registration order.
	pub fn keys(&self) -> Vec<String> {
		let mut keys: Vec<String> = Vec::new();
		for item in self.items.borrow().iter() {
			if !keys.iter().any(|k| k == item.key()) {
				keys.push(item.key().to_string());
			}
		}
		keys
	}

	pub fn count_for_key(&self, key: &str) -> usize {
		self.items
			.borrow()
			.iter()
			.filter(|item| item.key() == key)
			.count()
	}

	/// Runs `f` over the items registered under `key`, in registration order.
	pub fn with_items_for_key<R>(&self, key: &str, f: impl FnOnce(&[&dyn RemixerItem]) -> R) -> R {
		let items = self.items.borrow();
		let matching: Vec<&dyn RemixerItem> = items
			.iter()
			.filter(|item| item.key() == key)
			.map(|item| &**item)
			.collect();
		f(&matching)
	}

	/// Runs `f` on the item `owner` registered under `key`.
	///
	/// Returns `None` if there is no such item.
	pub fn with_item_mut<R>(
		&self,
		key: &str,
		owner: &dyn Host,
		f: impl FnOnce(&mut dyn RemixerItem) -> R,
	) -> Option<R> {
		let mut items = self.items.borrow_mut();
		let item = items
			.iter_mut()
			.find(|item| item.key() == key && item.is_owned_by(Some(owner)))?;
		Some(f(&mut **item))
	}

	/// Drains keys reported through [`ItemRegistry::notify_key_changed`].
	pub fn take_pending_changes(&self) -> Vec<String> {
		std::mem::take(&mut *self.pending.borrow_mut())
	}
}

impl ItemRegistry for KeyedRegistry {
	fn notify_key_changed(&self, key: &str) {
		let mut pending = self.pending.borrow_mut();
		if !pending.iter().any(|k| k == key) {
			pending.push(key.to_string());
		}
		tracing::trace!(key, "item change queued");
	}
}

impl std::fmt::Debug for KeyedRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("KeyedRegistry")
			.field("config", &self.config)
			.field("items", &self.len())
			.finish()
	}
}
