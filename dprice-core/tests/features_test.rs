use dprice_core::{build_feature_vector, ModelVariant, PricingError, RawInput};

fn scenario() -> RawInput {
    RawInput {
        carat: 0.7,
        depth: 61.8,
        table: 57.0,
        x: 5.7,
        y: 5.7,
        z: 3.5,
        cut: "Fair".into(),
        color: "I".into(),
        clarity: "VS2".into(),
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn ordinal_schema_snapshot() {
    let variant = ModelVariant::xgboost().unwrap();
    let fv = build_feature_vector(&scenario(), &variant.table).unwrap();
    let names: Vec<&str> = fv.names().collect();
    assert_eq!(
        names,
        [
            "carat", "cut", "color", "clarity", "depth", "table", "x", "y", "z", "volume", "density",
            "xy_ratio"
        ]
    );
    assert_eq!(variant.table.schema(), names);
}

#[test]
fn ordinal_scenario_values() {
    let table = ModelVariant::xgboost().unwrap().table;
    let fv = build_feature_vector(&scenario(), &table).unwrap();

    assert_eq!(fv.get("carat"), Some(0.7));
    assert_eq!(fv.get("cut"), Some(1.0));
    assert_eq!(fv.get("color"), Some(2.0));
    assert_eq!(fv.get("clarity"), Some(4.0));
    assert_eq!(fv.get("depth"), Some(61.8));
    assert_eq!(fv.get("table"), Some(57.0));

    let volume = fv.get("volume").unwrap();
    assert!(close(volume, 113.715), "{volume}");
    let density = fv.get("density").unwrap();
    assert!(close(density, 0.7 / 113.715), "{density}");
    assert!((density - 0.006157).abs() < 1e-5, "{density}");
    assert_eq!(fv.get("xy_ratio"), Some(1.0));
}

#[test]
fn random_forest_uses_its_own_ranks() {
    let table = ModelVariant::random_forest().unwrap().table;
    let fv = build_feature_vector(&scenario(), &table).unwrap();
    assert_eq!(fv.get("cut"), Some(1.0));
    assert_eq!(fv.get("color"), Some(6.0));
    assert_eq!(fv.get("clarity"), Some(6.0));
}

#[test]
fn one_hot_schema_snapshot() {
    let variant = ModelVariant::one_hot().unwrap();
    let mut raw = scenario();
    raw.cut = "Ideal".into();
    let fv = build_feature_vector(&raw, &variant.table).unwrap();

    let names: Vec<&str> = fv.names().collect();
    assert_eq!(
        names,
        [
            "carat",
            "depth",
            "table",
            "clarity_I1",
            "clarity_IF",
            "clarity_SI1",
            "clarity_SI2",
            "clarity_VS1",
            "clarity_VS2",
            "clarity_VVS1",
            "clarity_VVS2",
            "color_D",
            "color_E",
            "color_F",
            "color_G",
            "color_H",
            "color_I",
            "color_J",
            "cut_Fair",
            "cut_Good",
            "cut_Ideal",
            "cut_Premium",
            "cut_Very Good",
        ]
    );
    assert_eq!(variant.table.schema(), names);
    assert!(fv.get("volume").is_none());
    assert!(fv.get("density").is_none());
    assert!(fv.get("xy_ratio").is_none());
}

#[test]
fn one_hot_scenario_values() {
    let table = ModelVariant::one_hot().unwrap().table;
    let mut raw = scenario();
    raw.cut = "Ideal".into();
    let fv = build_feature_vector(&raw, &table).unwrap();

    assert_eq!(fv.get("cut_Ideal"), Some(1.0));
    for other in ["cut_Premium", "cut_Very Good", "cut_Good", "cut_Fair"] {
        assert_eq!(fv.get(other), Some(0.0), "{other}");
    }
    assert_eq!(fv.get("color_I"), Some(1.0));
    assert_eq!(fv.get("clarity_VS2"), Some(1.0));
    assert_eq!(fv.values().filter(|v| *v == 1.0).count(), 3);
}

#[test]
fn one_hot_with_derived_features_appends_geometry() {
    let table = ModelVariant::one_hot().unwrap().table.with_derived_features(true);
    let fv = build_feature_vector(&scenario(), &table).unwrap();
    let names: Vec<&str> = fv.names().collect();
    assert_eq!(&names[names.len() - 3..], ["volume", "density", "xy_ratio"]);
    assert_eq!(fv.len(), 3 + 20 + 3);
    assert_eq!(table.schema(), names);
}

#[test]
fn zero_dimensions_fall_back_to_zero() {
    let table = ModelVariant::xgboost().unwrap().table;

    let mut raw = scenario();
    raw.y = 0.0;
    let fv = build_feature_vector(&raw, &table).unwrap();
    assert_eq!(fv.get("volume"), Some(0.0));
    assert_eq!(fv.get("density"), Some(0.0));
    assert_eq!(fv.get("xy_ratio"), Some(0.0));

    let mut raw = scenario();
    raw.z = 0.0;
    let fv = build_feature_vector(&raw, &table).unwrap();
    assert_eq!(fv.get("density"), Some(0.0));
    assert_eq!(fv.get("xy_ratio"), Some(1.0));

    let mut raw = scenario();
    raw.x = 0.0;
    let fv = build_feature_vector(&raw, &table).unwrap();
    assert_eq!(fv.get("density"), Some(0.0));
    assert_eq!(fv.get("xy_ratio"), Some(0.0));
}

#[test]
fn unknown_label_produces_no_vector() {
    let table = ModelVariant::xgboost().unwrap().table;
    let mut raw = scenario();
    raw.clarity = "X".into();
    assert!(matches!(
        build_feature_vector(&raw, &table),
        Err(PricingError::UnknownCategory { .. })
    ));
}

#[test]
fn schema_matches_for_every_option_combination() {
    for name in ["xgboost", "random_forest", "one_hot"] {
        let variant = ModelVariant::by_name(name).unwrap();
        let schema = variant.table.schema();
        let mut raw = variant.default_input();
        for cut in variant.table.options(dprice_core::Attribute::Cut) {
            for clarity in variant.table.options(dprice_core::Attribute::Clarity) {
                raw.cut = cut.to_string();
                raw.clarity = clarity.to_string();
                let fv = build_feature_vector(&raw, &variant.table).unwrap();
                assert!(fv.names().eq(schema.iter().map(String::as_str)), "{name}");
            }
        }
    }
}

#[test]
fn feature_vector_json_keeps_schema_order() {
    let table = ModelVariant::xgboost().unwrap().table;
    let fv = build_feature_vector(&scenario(), &table).unwrap();
    let json = serde_json::to_string(&fv).unwrap();
    assert!(json.starts_with(r#"{"carat":0.7,"cut":1.0,"color":2.0,"clarity":4.0,"depth":61.8"#), "{json}");
    assert!(json.ends_with(r#""xy_ratio":1.0}"#), "{json}");
}
