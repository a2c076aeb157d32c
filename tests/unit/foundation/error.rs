use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SlidecastError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SlidecastError::parse("x").to_string().contains("parse error:"));
    assert!(
        SlidecastError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        SlidecastError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        SlidecastError::empty_input("x")
            .to_string()
            .contains("empty input:")
    );
    assert!(
        SlidecastError::not_found("x")
            .to_string()
            .contains("not found:")
    );
    assert!(
        SlidecastError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SlidecastError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn kind_separates_client_and_server_failures() {
    assert_eq!(
        SlidecastError::not_found("deck.txt").kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        SlidecastError::validation("bad name").kind(),
        ErrorKind::BadRequest
    );
    assert_eq!(SlidecastError::render("disk").kind(), ErrorKind::Internal);
    assert_eq!(
        SlidecastError::empty_input("no slides").kind(),
        ErrorKind::Internal
    );
}
