//! Integration tests covering street-name list loading.
use std::{fs, io::Cursor};

use citygrid_providers_names::{NameListError, StreetNameList};
use citygrid_test_support::fixtures::{ruas_document, street_names};
use rstest::rstest;
use tempfile::TempDir;

#[rstest]
#[case::ruas(r#"{"ruas": ["Rua A", "Rua B"]}"#)]
#[case::streets(r#"{"streets": ["Rua A", "Rua B"], "city": "Recife"}"#)]
#[case::bare(r#"["Rua A", "", "  Rua B  "]"#)]
fn accepts_json_layouts(#[case] raw: &str) {
    let list = StreetNameList::try_from_json_reader(Cursor::new(raw)).expect("layout is accepted");
    assert_eq!(list.names(), ["Rua A", "Rua B"]);
}

#[rstest]
#[case::scalar("42", NameListError::UnexpectedShape { reason: "" })]
#[case::wrong_key(r#"{"roads": ["Rua A"]}"#, NameListError::UnexpectedShape { reason: "" })]
#[case::non_string(r#"["Rua A", 7]"#, NameListError::UnexpectedShape { reason: "" })]
#[case::empty_array("[]", NameListError::EmptyInput)]
#[case::only_blanks(r#"{"ruas": [" ", ""]}"#, NameListError::EmptyInput)]
fn rejects_unusable_json(#[case] raw: &str, #[case] expected: NameListError) {
    let err = StreetNameList::try_from_json_reader(Cursor::new(raw)).expect_err("input is rejected");
    assert_eq!(err.code(), expected.code());
}

#[rstest]
fn malformed_json_is_a_json_error() {
    let err = StreetNameList::try_from_json_reader(Cursor::new("{\"ruas\": ["))
        .expect_err("truncated document is rejected");
    assert!(matches!(err, NameListError::Json(_)));
}

#[rstest]
#[case("alpha\nbeta\n", &["alpha", "beta"])]
#[case("carriage\r\nreturn\r\n", &["carriage", "return"])]
#[case("\n  lonely  \n\n", &["lonely"])]
fn text_lines_are_trimmed(#[case] raw: &str, #[case] expected: &[&str]) {
    let list = StreetNameList::try_from_text_reader(Cursor::new(raw)).expect("text is accepted");
    let names: Vec<&str> = list.names().iter().map(String::as_str).collect();
    assert_eq!(names, expected);
}

#[rstest]
fn empty_text_is_rejected() {
    let err = StreetNameList::try_from_text_reader(Cursor::new("\n \n"))
        .expect_err("blank input is rejected");
    assert!(matches!(err, NameListError::EmptyInput));
}

#[rstest]
fn path_extension_selects_the_parser() {
    let dir = TempDir::new().expect("temp dir");
    let json_path = dir.path().join("ruas.JSON");
    fs::write(&json_path, ruas_document(&street_names(3))).expect("write json");
    let text_path = dir.path().join("ruas.txt");
    fs::write(&text_path, "Rua X\nRua Y\n").expect("write text");

    let from_json = StreetNameList::try_from_path(&json_path).expect("json loads");
    assert_eq!(from_json.len(), 3);
    let from_text = StreetNameList::try_from_path(&text_path).expect("text loads");
    assert_eq!(from_text.names(), ["Rua X", "Rua Y"]);
}

#[rstest]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = StreetNameList::try_from_path(dir.path().join("absent.json"))
        .expect_err("missing file is rejected");
    assert_eq!(err.code(), "NAMES_IO");
}

#[rstest]
fn pool_deduplicates_names() {
    let list = StreetNameList::try_from_text_reader(Cursor::new("Rua A\nRua A\nRua B\n"))
        .expect("text is accepted");
    assert_eq!(list.len(), 3);
    let pool = list.to_pool();
    assert_eq!(pool.len(), 2);
    assert_eq!(list.into_iter().count(), 3);
}
