use super::common::*;
use crate::prediction::domain::{Gender, Geography};
use crate::prediction::encoder::{encode, FEATURE_COLUMNS, FEATURE_COUNT};

#[test]
fn default_form_profile_encodes_in_training_order() {
    let vector = encode(&profile());

    assert_eq!(
        vector.to_ordered(),
        [650.0, 40.0, 3.0, 50_000.0, 2.0, 1.0, 1.0, 50_000.0, 0.0, 0.0, 1.0]
    );
}

#[test]
fn germany_female_sets_trailing_flags() {
    let mut profile = profile();
    profile.geography = Geography::Germany;
    profile.gender = Gender::Female;

    let ordered = encode(&profile).to_ordered();

    assert_eq!(ordered.len(), FEATURE_COUNT);
    assert_eq!(&ordered[8..], &[1.0, 0.0, 0.0]);
}

#[test]
fn geography_is_reference_coded_against_france() {
    let expected = [
        (Geography::France, (0.0, 0.0)),
        (Geography::Germany, (1.0, 0.0)),
        (Geography::Spain, (0.0, 1.0)),
    ];

    for (geography, flags) in expected {
        let mut profile = profile();
        profile.geography = geography;
        let vector = encode(&profile);
        assert_eq!((vector.geo_germany, vector.geo_spain), flags, "{geography}");
        assert!(vector.geo_germany + vector.geo_spain <= 1.0);
    }
}

#[test]
fn named_columns_line_up_with_positions() {
    let vector = encode(&profile());
    let columns: Vec<_> = vector.columns().collect();

    assert_eq!(columns.len(), FEATURE_COUNT);
    assert_eq!(columns[0], ("CreditScore", 650.0));
    assert_eq!(columns[3], ("Balance", 50_000.0));
    assert_eq!(columns[6], ("IsActiveMember", 1.0));
    assert_eq!(columns[10], ("Gender_Male", 1.0));
    for (index, (name, _)) in columns.iter().enumerate() {
        assert_eq!(*name, FEATURE_COLUMNS[index]);
    }
}

#[test]
fn encoding_is_bit_for_bit_repeatable() {
    let mut profile = profile();
    profile.balance = 83_807.86;
    profile.salary = 112_542.58;

    let first = encode(&profile).to_ordered().map(f64::to_bits);
    let second = encode(&profile).to_ordered().map(f64::to_bits);

    assert_eq!(first, second);
}

#[test]
fn out_of_range_values_are_not_clamped() {
    let mut profile = profile();
    profile.age = 130;
    profile.num_products = 0;
    profile.balance = -25.0;
    profile.has_card = false;

    let vector = encode(&profile);

    assert_eq!(vector.age, 130.0);
    assert_eq!(vector.num_products, 0.0);
    assert_eq!(vector.balance, -25.0);
    assert_eq!(vector.has_card, 0.0);
}
