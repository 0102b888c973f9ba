use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use remixer_core::{HostTable, ItemKind, Mismatch, RemixerItem};
use rstest::rstest;

use crate::common::{ChoiceVariable, PlayerScreen, RangeVariable, Trigger};

#[test]
fn matching_ranges_are_compatible_both_ways() {
	let hosts = HostTable::new();
	let before = PlayerScreen::attach(&hosts);
	let after = PlayerScreen::attach(&hosts);
	let a = RangeVariable::new("volume", &before, 0, 10, 1);
	let b = RangeVariable::new("volume", &after, 0, 10, 1);

	assert_eq!(a.check_compatible_with(&b), Ok(()));
	assert_eq!(b.check_compatible_with(&a), Ok(()));
}

#[rstest]
#[case::wider_max(0, 100, 1)]
#[case::shifted_min(1, 10, 1)]
#[case::coarser_step(0, 10, 2)]
fn differing_ranges_conflict(#[case] min: i64, #[case] max: i64, #[case] step: i64) {
	let hosts = HostTable::new();
	let host1 = PlayerScreen::attach(&hosts);
	let host2 = PlayerScreen::attach(&hosts);
	let a = RangeVariable::new("volume", &host1, 0, 10, 1);
	let b = RangeVariable::new("volume", &host2, min, max, step);

	let err = a.check_compatible_with(&b).unwrap_err();
	assert_eq!(err.key, "volume");
	assert!(matches!(err.mismatch, Mismatch::Constraints(_)));
	assert!(err.to_string().contains("\"volume\""));
}

#[test]
fn variable_and_trigger_conflict() {
	let hosts = HostTable::new();
	let host = PlayerScreen::attach(&hosts);
	let log = Rc::new(RefCell::new(Vec::new()));
	let variable = RangeVariable::new("volume", &host, 0, 10, 1);
	let trigger = Trigger::new("volume", &host, &log);

	let err = variable.check_compatible_with(&trigger).unwrap_err();
	assert_eq!(
		err.mismatch,
		Mismatch::Kind {
			expected: ItemKind::Variable,
			found: ItemKind::Trigger,
		}
	);
	assert!(trigger.check_compatible_with(&variable).is_err());
}

#[test]
fn variables_over_different_value_types_conflict() {
	let hosts = HostTable::new();
	let host = PlayerScreen::attach(&hosts);
	let range = RangeVariable::new("mode", &host, 0, 3, 1);
	let choice = ChoiceVariable::new("mode", &host, &["a", "b"]);

	let err = range.check_compatible_with(&choice).unwrap_err();
	assert!(matches!(err.mismatch, Mismatch::ValueType { .. }));
}

#[test]
fn compatibility_may_be_asymmetric() {
	let hosts = HostTable::new();
	let host1 = PlayerScreen::attach(&hosts);
	let host2 = PlayerScreen::attach(&hosts);
	let wide = ChoiceVariable::new("theme", &host1, &["light", "dark", "sepia"]);
	let narrow = ChoiceVariable::new("theme", &host2, &["light", "dark"]);

	assert_eq!(wide.check_compatible_with(&narrow), Ok(()));
	let err = narrow.check_compatible_with(&wide).unwrap_err();
	assert_eq!(
		err.mismatch,
		Mismatch::Constraints("choice \"sepia\" is not offered".into())
	);
}
