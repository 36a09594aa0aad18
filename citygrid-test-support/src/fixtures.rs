//! Street-name fixtures.

/// `count` distinct street names of the form `Rua {n}`.
///
/// # Examples
/// ```
/// use citygrid_test_support::fixtures::street_names;
///
/// assert_eq!(street_names(2), vec!["Rua 0".to_owned(), "Rua 1".to_owned()]);
/// ```
#[must_use]
pub fn street_names(count: usize) -> Vec<String> {
    (0..count).map(|index| format!("Rua {index}")).collect()
}

/// Enough names for any street layout of a `rows x columns` grid.
///
/// A grid never has more than two streets per intersection.
#[must_use]
pub fn names_for_grid(rows: usize, columns: usize) -> Vec<String> {
    street_names(2 * rows * columns)
}

/// A name list document in the `{"ruas": [...]}` layout.
#[must_use]
pub fn ruas_document(names: &[String]) -> String {
    serde_json::json!({ "ruas": names }).to_string()
}
