use pretty_assertions::assert_eq;
use remixer_core::{DEFAULT_LAYOUT, Host, HostTable, HostType, ItemCore, ItemError, RemixerItem};

use crate::common::{PlayerScreen, RangeVariable, SettingsScreen};

#[test]
fn volume_item_is_owned_by_its_screen_only() {
	let hosts = HostTable::new();
	let host1 = PlayerScreen::attach(&hosts);
	let host2 = PlayerScreen::attach(&hosts);

	let core = ItemCore::new("Volume", "volume", &host1, DEFAULT_LAYOUT).unwrap();

	assert_eq!(core.title(), "Volume");
	assert_eq!(core.key(), "volume");
	assert_eq!(core.layout_hint(), 0);
	assert!(core.is_owned_by(Some(&host1)));
	assert!(!core.is_owned_by(Some(&host2)));
	assert!(!core.is_owned_by(None));
}

#[test]
fn reclaimed_owner_is_no_longer_recognized() {
	let hosts = HostTable::new();
	let host = PlayerScreen::attach(&hosts);
	let item = RangeVariable::new("volume", &host, 0, 10, 1);
	assert!(item.has_live_owner());

	hosts.detach(host.host_handle().id());

	assert!(!item.has_live_owner());
	assert!(!item.is_owned_by(Some(&host)));
	assert!(!item.is_owned_by(None));
}

#[test]
fn owner_type_check_outlives_owner() {
	let hosts = HostTable::new();
	let host = PlayerScreen::attach(&hosts);
	let mut item = RangeVariable::new("volume", &host, 0, 10, 1);
	item.core_mut().simulate_owner_reclaimed();
	drop(host);

	let rotated = PlayerScreen::attach(&hosts);
	let settings = SettingsScreen::attach(&hosts);

	assert!(item.is_same_owner_type_as(&rotated));
	assert!(!item.is_same_owner_type_as(&settings));
	assert_eq!(item.core().owner_type(), HostType::of::<PlayerScreen>());
}

#[test]
fn identity_does_not_change_after_reclaim() {
	let hosts = HostTable::new();
	let host = PlayerScreen::attach(&hosts);
	let item = RangeVariable::new("volume", &host, 0, 10, 1);

	hosts.detach(host.host_handle().id());

	assert_eq!(item.key(), "volume");
	assert_eq!(item.title(), "volume");
	assert_eq!(item.layout_hint(), DEFAULT_LAYOUT);
}

#[test]
fn constructing_for_destroyed_owner_fails() {
	let hosts = HostTable::new();
	let host = PlayerScreen::attach(&hosts);
	hosts.detach(host.host_handle().id());

	let err = ItemCore::new("Volume", "volume", &host, DEFAULT_LAYOUT).unwrap_err();
	assert!(matches!(err, ItemError::InvalidArgument(_)));
}
