use super::*;

#[test]
fn round_trips_typed_values() {
    let store = ContextStore::new();
    store.set("temp", ContextValue::from(21.5));
    store.set("active", ContextValue::from(true));
    store.set("label", ContextValue::from("edge"));

    assert_eq!(store.get("temp"), Some(ContextValue::Number(21.5)));
    assert_eq!(store.get("active"), Some(ContextValue::Bool(true)));
    assert_eq!(store.get("label"), Some(ContextValue::Str("edge".into())));
    assert_eq!(store.get("missing"), None);
}

#[test]
fn from_str_infers_number_and_bool() {
    assert_eq!(ContextValue::from("5"), ContextValue::Number(5.0));
    assert_eq!(ContextValue::from("true"), ContextValue::Bool(true));
    assert_eq!(ContextValue::from("hello"), ContextValue::Str("hello".into()));
}

#[test]
fn as_f64_coerces_bool_and_numeric_string() {
    assert_eq!(ContextValue::Bool(true).as_f64(), Some(1.0));
    assert_eq!(ContextValue::Str("3.5".into()).as_f64(), Some(3.5));
    assert_eq!(ContextValue::Str("nope".into()).as_f64(), None);
}

#[test]
fn snapshot_reflects_latest_writes() {
    let store = ContextStore::new();
    store.set("v", ContextValue::from(1.0));
    store.set("v", ContextValue::from(2.0));
    let snap = store.snapshot();
    assert_eq!(snap.get("v"), Some(&ContextValue::Number(2.0)));
}
