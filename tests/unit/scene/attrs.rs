use super::*;

#[test]
fn read_before_declare_is_a_precondition_error() {
    let store = AttrStore::new();
    let err = store.read_all().unwrap_err();
    assert!(err.is_precondition());
}

#[test]
fn declare_is_idempotent() {
    let mut store = AttrStore::new();
    store.declare_and_write("value", 1.0);
    store.declare_and_write("value", 2.0);
    assert_eq!(store.declared_names().count(), 1);
    assert_eq!(store.read_all().unwrap().num("value").unwrap(), 2.0);
}

#[test]
fn numeric_strings_read_back_as_numbers() {
    let mut store = AttrStore::new();
    store.declare_and_write("label", "123");
    store.declare_and_write("name", "abc");
    store.declare_and_write("padded", " 4.5 ");
    store.declare_and_write("empty", "");
    store.declare_and_write("inf", "inf");
    let attrs = store.read_all().unwrap();
    assert_eq!(attrs.get("label"), Some(&AttrValue::Num(123.0)));
    assert_eq!(attrs.get("name"), Some(&AttrValue::Str("abc".into())));
    assert_eq!(attrs.get("padded"), Some(&AttrValue::Num(4.5)));
    assert_eq!(attrs.get("empty"), Some(&AttrValue::Str(String::new())));
    assert_eq!(attrs.get("inf"), Some(&AttrValue::Str("inf".into())));
    // raw storage is untouched
    assert_eq!(store.raw("label"), Some(&AttrValue::Str("123".into())));
}

#[test]
fn accessors_report_kind_mismatches() {
    let mut store = AttrStore::new();
    store.declare_and_write("label", "b");
    store.declare_and_write("value", 25.0);
    store.declare_and_write("fillStyle", Color::rgb8(255, 0, 0));
    let attrs = store.read_all().unwrap();

    assert!(matches!(attrs.num("label"), Err(ChartError::MalformedInput(_))));
    assert!(attrs.num("missing").unwrap_err().is_precondition());
    assert_eq!(attrs.num_or("missing", 7.0), 7.0);
    assert_eq!(attrs.text("value").unwrap(), "25");
    assert_eq!(attrs.text("label").unwrap(), "b");
    assert_eq!(attrs.color("fillStyle").unwrap().to_rgba8(), [255, 0, 0, 255]);
    assert!(attrs.color("value").is_err());
}

#[test]
fn bool_and_int_values_are_numeric() {
    let mut store = AttrStore::new();
    store.declare_and_write("dashed", true);
    store.declare_and_write("count", 3);
    let attrs = store.read_all().unwrap();
    assert_eq!(attrs.num("dashed").unwrap(), 1.0);
    assert_eq!(attrs.num("count").unwrap(), 3.0);
    assert_eq!(attrs.len(), 2);
}
