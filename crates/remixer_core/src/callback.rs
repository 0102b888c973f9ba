//! Clearable callback storage for concrete item kinds.

use std::fmt;

/// Holds at most one callback invoked with `&A`.
///
/// Callbacks routinely capture their host, so items drop them through
/// [`CallbackSlot::clear`] once the host is torn down.
pub struct CallbackSlot<A: ?Sized> {
	callback: Option<Box<dyn FnMut(&A)>>,
}

impl<A: ?Sized> CallbackSlot<A> {
	pub fn new(callback: impl FnMut(&A) + 'static) -> Self {
		Self {
			callback: Some(Box::new(callback)),
		}
	}

	pub fn empty() -> Self {
		Self { callback: None }
	}

	/// Replaces the current callback.
	pub fn set(&mut self, callback: impl FnMut(&A) + 'static) {
		self.callback = Some(Box::new(callback));
	}

	pub fn is_set(&self) -> bool {
		self.callback.is_some()
	}

	/// Invokes the callback, returning `false` if none is set.
	pub fn invoke(&mut self, arg: &A) -> bool {
		match self.callback.as_mut() {
			Some(callback) => {
				callback(arg);
				true
			}
			None => false,
		}
	}

	/// Drops the callback. Returns `true` only if one was actually dropped.
	pub fn clear(&mut self) -> bool {
		self.callback.take().is_some()
	}
}

impl<A: ?Sized> Default for CallbackSlot<A> {
	fn default() -> Self {
		Self::empty()
	}
}

impl<A: ?Sized> fmt::Debug for CallbackSlot<A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CallbackSlot")
			.field("set", &self.is_set())
			.finish()
	}
}
