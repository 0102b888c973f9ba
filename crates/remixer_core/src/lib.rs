#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Identity and lifecycle model for remixer items.
//!
//! A remixer item is a runtime-tunable variable or trigger that a host (usually
//! a UI screen) exposes for live adjustment. Hosts are routinely destroyed and
//! recreated, so items never own their host: they keep a generational
//! [`HostHandle`] into a [`HostTable`] and a [`HostType`] snapshot that stays
//! comparable after the host is gone.
//!
//! Items sharing a key across host recreations are the same logical item only
//! if [`RemixerItem::check_compatible_with`] agrees. [`KeyedRegistry`] shows the
//! contract in use: it groups items by key, refuses conflicting registrations,
//! and retires items whose hosts are gone.

/// Clearable callback storage for concrete item kinds.
pub mod callback;
/// Registry configuration loaded from TOML.
pub mod config;
/// Error types.
pub mod error;
/// Host table, generational host ids, and type snapshots.
pub mod host;
/// Item identity, ownership tracking, and the compatibility protocol.
pub mod item;
/// Keyed aggregation of items.
pub mod registry;

pub use callback::CallbackSlot;
pub use config::RegistryConfig;
pub use error::{ConfigError, IncompatibleItems, ItemError, Mismatch, RegistryError};
pub use host::{Host, HostHandle, HostId, HostTable, HostType};
pub use item::{DEFAULT_LAYOUT, ItemCore, ItemKind, ItemState, RemixerItem, same_kind};
pub use registry::{ItemRegistry, KeyedRegistry};
