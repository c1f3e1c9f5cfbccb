use dprice_core::{encode, Attribute, ColumnOrder, Encoded, ModelVariant, PricingError};

// ============================================================================
// Ordinal
// ============================================================================

#[test]
fn ordinal_ranks_are_distinct_and_in_range() {
    for variant in [ModelVariant::xgboost().unwrap(), ModelVariant::random_forest().unwrap()] {
        for attr in Attribute::ALL {
            let options = variant.table.options(attr);
            let mut ranks: Vec<u32> = options
                .iter()
                .map(|label| match encode(attr, label, &variant.table).unwrap() {
                    Encoded::Rank(r) => r,
                    other => panic!("expected rank, got {other:?}"),
                })
                .collect();
            ranks.sort_unstable();
            let expected: Vec<u32> = (1..=options.len() as u32).collect();
            assert_eq!(ranks, expected, "{} {attr}", variant.name);
        }
    }
}

#[test]
fn xgboost_ranks() {
    let table = ModelVariant::xgboost().unwrap().table;
    assert_eq!(encode(Attribute::Cut, "Fair", &table).unwrap(), Encoded::Rank(1));
    assert_eq!(encode(Attribute::Cut, "Ideal", &table).unwrap(), Encoded::Rank(5));
    assert_eq!(encode(Attribute::Color, "I", &table).unwrap(), Encoded::Rank(2));
    assert_eq!(encode(Attribute::Clarity, "VS2", &table).unwrap(), Encoded::Rank(4));
}

#[test]
fn random_forest_ranks_differ_from_xgboost() {
    let rf = ModelVariant::random_forest().unwrap().table;
    assert_eq!(encode(Attribute::Cut, "Ideal", &rf).unwrap(), Encoded::Rank(3));
    assert_eq!(encode(Attribute::Color, "D", &rf).unwrap(), Encoded::Rank(1));
    assert_eq!(encode(Attribute::Clarity, "IF", &rf).unwrap(), Encoded::Rank(2));
}

#[test]
fn unknown_clarity_is_rejected() {
    let table = ModelVariant::xgboost().unwrap().table;
    let err = encode(Attribute::Clarity, "X", &table).unwrap_err();
    match &err {
        PricingError::UnknownCategory { attribute, label } => {
            assert_eq!(*attribute, Attribute::Clarity);
            assert_eq!(label, "X");
        }
        other => panic!("expected UnknownCategory, got {other:?}"),
    }
    assert!(err.is_client_error());
    assert_eq!(err.to_string(), "unknown clarity category: 'X'");
}

#[test]
fn labels_are_case_sensitive() {
    let table = ModelVariant::xgboost().unwrap().table;
    assert!(encode(Attribute::Cut, "ideal", &table).is_err());
    assert!(encode(Attribute::Cut, "VeryGood", &table).is_err());
}

// ============================================================================
// One-hot
// ============================================================================

#[test]
fn one_hot_has_exactly_one_hot_column() {
    let table = ModelVariant::one_hot().unwrap().table;
    for attr in Attribute::ALL {
        let vocab = table.options(attr);
        for label in &vocab {
            let Encoded::OneHot(columns) = encode(attr, label, &table).unwrap() else {
                panic!("expected one-hot");
            };
            assert_eq!(columns.len(), vocab.len());
            let hot: Vec<&str> = columns
                .iter()
                .filter(|(_, v)| *v == 1.0)
                .map(|(n, _)| n.as_str())
                .collect();
            assert_eq!(hot, vec![format!("{attr}_{label}")]);
            assert!(columns.iter().all(|(_, v)| *v == 0.0 || *v == 1.0));
        }
    }
}

#[test]
fn one_hot_ideal_cut() {
    let table = ModelVariant::one_hot().unwrap().table;
    let Encoded::OneHot(columns) = encode(Attribute::Cut, "Ideal", &table).unwrap() else {
        panic!("expected one-hot");
    };
    assert_eq!(
        columns,
        vec![
            ("cut_Ideal".to_string(), 1.0),
            ("cut_Premium".to_string(), 0.0),
            ("cut_Very Good".to_string(), 0.0),
            ("cut_Good".to_string(), 0.0),
            ("cut_Fair".to_string(), 0.0),
        ]
    );
}

#[test]
fn one_hot_unknown_label() {
    let table = ModelVariant::one_hot().unwrap().table;
    assert!(matches!(
        encode(Attribute::Color, "Z", &table),
        Err(PricingError::UnknownCategory { attribute: Attribute::Color, .. })
    ));
}

#[test]
fn one_hot_columns_sorted_by_default() {
    let table = ModelVariant::one_hot().unwrap().table;
    let columns = table.one_hot_columns();
    assert_eq!(columns.len(), 5 + 7 + 8);
    let mut sorted = columns.clone();
    sorted.sort();
    assert_eq!(columns, sorted);
    assert_eq!(columns.first().map(String::as_str), Some("clarity_I1"));
    assert_eq!(columns.last().map(String::as_str), Some("cut_Very Good"));
}

#[test]
fn one_hot_columns_declared_order() {
    let table = ModelVariant::one_hot()
        .unwrap()
        .table
        .with_column_order(ColumnOrder::Declared);
    let columns = table.one_hot_columns();
    assert_eq!(&columns[..2], ["cut_Ideal", "cut_Premium"]);
    assert_eq!(columns[5], "color_D");
    assert_eq!(columns[12], "clarity_IF");
}
