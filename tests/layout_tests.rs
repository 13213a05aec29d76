mod common;

use keycraft::geometry::{LayoutType, SLOT_COUNT};
use keycraft::layout::SplitLayout;
use keycraft::layouts::{get_all_layouts, KnownLayout};
use proptest::prelude::*;
use rstest::rstest;
use strum::IntoEnumIterator;

fn arb_layout_type() -> impl Strategy<Value = LayoutType> {
    prop::sample::select(LayoutType::iter().collect::<Vec<_>>())
}

prop_compose! {
    fn arb_layout()(
        lt in arb_layout_type(),
        order in Just((0..SLOT_COUNT).collect::<Vec<usize>>()).prop_shuffle(),
    ) -> SplitLayout {
        let base = common::qwerty();
        let mut runes = base.runes;
        for (dst, &src) in order.iter().enumerate() {
            runes[dst] = base.runes[src];
        }
        SplitLayout::new("shuffled", lt, runes).unwrap()
    }
}

proptest! {
    #[test]
    fn prop_flip_twice_restores_runes(layout in arb_layout()) {
        let mut flipped = layout.clone();
        flipped.flip_horizontal();
        prop_assert!(flipped.is_permutation_of(&layout));
        flipped.flip_horizontal();
        prop_assert_eq!(flipped.runes, layout.runes);
    }

    #[test]
    fn prop_swaps_preserve_multiset(
        layout in arb_layout(),
        swaps in proptest::collection::vec((0..SLOT_COUNT, 0..SLOT_COUNT), 0..40),
    ) {
        let mut l = layout.clone();
        for (i, j) in swaps {
            l.swap(i, j);
        }
        prop_assert!(l.is_permutation_of(&layout));
        prop_assert!(l.validate().is_ok());
    }

    #[test]
    fn prop_distance_is_symmetric(
        lt in arb_layout_type(),
        i in 0..SLOT_COUNT,
        j in 0..SLOT_COUNT,
    ) {
        let a = lt.distance(i, j);
        let b = lt.distance(j, i);
        prop_assert!((a.distance - b.distance).abs() < 1e-12);
        prop_assert_eq!(lt.is_lateral_stretch(i, j), lt.is_lateral_stretch(j, i));
    }
}

#[rstest]
#[case(KnownLayout::Qwerty, 'a', 13)]
#[case(KnownLayout::Colemak, 't', 16)]
#[case(KnownLayout::Dvorak, 'u', 16)]
#[case(KnownLayout::Graphite, 'h', 19)]
fn test_known_layout_positions(#[case] known: KnownLayout, #[case] c: char, #[case] slot: usize) {
    let l = known.to_layout().unwrap();
    assert_eq!(l.slot_of(c), Some(slot));
}

#[test]
fn test_every_known_layout_loads() {
    let all = get_all_layouts().unwrap();
    assert_eq!(all.len(), KnownLayout::iter().count());
    for l in &all {
        assert!(l.validate().is_ok());
    }
}

#[test]
fn test_layout_file_roundtrip() {
    let ctx = common::TestContext::new("");
    let path = ctx.path("layout.json");
    let l = KnownLayout::ColemakDh.to_layout().unwrap();
    l.save_to_file(&path).unwrap();
    assert_eq!(SplitLayout::load_from_file(&path).unwrap(), l);
}

#[test]
fn test_layout_file_missing() {
    let ctx = common::TestContext::new("");
    assert!(SplitLayout::load_from_file(ctx.path("nope.json")).is_err());
}
