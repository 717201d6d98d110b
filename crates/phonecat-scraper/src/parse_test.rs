use super::*;

// -----------------------------------------------------------------------
// capacity_key
// -----------------------------------------------------------------------

#[test]
fn capacity_gigabytes_as_is() {
    assert_eq!(capacity_key("128GB"), Some(128));
    assert_eq!(capacity_key("256gb"), Some(256));
}

#[test]
fn capacity_terabytes_scaled() {
    assert_eq!(capacity_key("1TB"), Some(1024));
    assert_eq!(capacity_key("2tb"), Some(2048));
}

#[test]
fn capacity_tolerates_spaces() {
    assert_eq!(capacity_key(" 512 GB "), Some(512));
}

#[test]
fn capacity_unknown_unit_is_none() {
    assert_eq!(capacity_key("64MB"), None);
    assert_eq!(capacity_key("GB"), None);
    assert_eq!(capacity_key("large"), None);
    assert_eq!(capacity_key(""), None);
}

#[test]
fn capacity_sort_orders_mixed_units() {
    let mut values = vec!["2TB", "64GB", "unknown", "1TB", "256GB"];
    values.sort_by(|a, b| capacity_sort_key(a).cmp(&capacity_sort_key(b)));
    assert_eq!(values, vec!["64GB", "256GB", "1TB", "2TB", "unknown"]);
}

// -----------------------------------------------------------------------
// parse_model_id / display_name
// -----------------------------------------------------------------------

#[test]
fn display_name_for_each_tier() {
    assert_eq!(display_name("iphone-16"), "iPhone 16");
    assert_eq!(display_name("iphone-16-plus"), "iPhone 16 Plus");
    assert_eq!(display_name("iphone-16-pro"), "iPhone 16 Pro");
    assert_eq!(display_name("iphone-16-pro-max"), "iPhone 16 Pro Max");
}

#[test]
fn display_name_keeps_generation_letters() {
    assert_eq!(display_name("iphone-16e"), "iPhone 16e");
}

#[test]
fn display_name_unparsable_id_is_verbatim() {
    assert_eq!(display_name("ipad-air"), "ipad-air");
    assert_eq!(display_name("iphone-x"), "iphone-x");
    assert_eq!(display_name("iphone-16-ultra"), "iphone-16-ultra");
    assert_eq!(display_name("iphone-16-max"), "iphone-16-max");
    assert_eq!(display_name("iphone-"), "iphone-");
}

#[test]
fn pro_max_detected_before_pro() {
    let parsed = parse_model_id("iphone-15-pro-max").unwrap();
    assert_eq!(parsed.tier, ModelTier::ProMax);
    assert_eq!(parsed.number, 15);
}

#[test]
fn pro_outranks_plus_when_both_present() {
    assert_eq!(parse_model_id("iphone-16-plus-pro").unwrap().tier, ModelTier::Pro);
}

// -----------------------------------------------------------------------
// compare_model_ids
// -----------------------------------------------------------------------

#[test]
fn models_sort_by_generation_then_tier() {
    let mut ids = vec![
        "iphone-16-pro-max",
        "iphone-15",
        "iphone-16-plus",
        "iphone-16",
        "iphone-16-pro",
    ];
    ids.sort_by(|a, b| compare_model_ids(a, b));
    assert_eq!(
        ids,
        vec![
            "iphone-15",
            "iphone-16",
            "iphone-16-plus",
            "iphone-16-pro",
            "iphone-16-pro-max",
        ]
    );
}

#[test]
fn generation_compares_numerically() {
    assert_eq!(compare_model_ids("iphone-9", "iphone-10"), Ordering::Less);
}

#[test]
fn unparsed_ids_sort_last() {
    let mut ids = vec!["zz-model", "iphone-16", "aa-model", "iphone-11"];
    ids.sort_by(|a, b| compare_model_ids(a, b));
    assert_eq!(ids, vec!["iphone-11", "iphone-16", "aa-model", "zz-model"]);
}
