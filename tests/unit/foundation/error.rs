use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChartError::precondition("x")
            .to_string()
            .contains("precondition violated:")
    );
    assert!(
        ChartError::malformed("x")
            .to_string()
            .contains("malformed input:")
    );
    assert!(
        ChartError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ChartError::render("x").to_string().contains("render error:"));
    assert!(
        ChartError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChartError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_become_serde() {
    let err: ChartError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, ChartError::Serde(_)));
    assert!(!err.is_precondition());
    assert!(ChartError::precondition("x").is_precondition());
}
