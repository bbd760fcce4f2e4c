//! Text helpers for raw survey cells.

/// Replaces embedded carriage returns, tabs and newlines with `", "`.
///
/// Each control character is replaced on its own, so `"a\r\nb"` becomes
/// `"a, , b"`.
///
/// # Examples
///
/// ```
/// use survey_common::clean_cell_text;
///
/// assert_eq!(clean_cell_text("Very\nsatisfied"), "Very, satisfied");
/// assert_eq!(clean_cell_text("plain"), "plain");
/// ```
pub fn clean_cell_text(value: &str) -> String {
    if !value.contains(['\r', '\t', '\n']) {
        return value.to_string();
    }
    value
        .replace('\r', ", ")
        .replace('\t', ", ")
        .replace('\n', ", ")
}

/// True when the cell is missing or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// True when the trimmed value is non-empty and made only of ASCII digits.
///
/// Only such values are looked up in a question's value domain.
pub fn is_numeric_code(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// Group key of a variable: the text before its first `_`, or the whole name.
///
/// # Examples
///
/// ```
/// use survey_common::group_key;
///
/// assert_eq!(group_key("Q12_3"), "Q12");
/// assert_eq!(group_key("Q7"), "Q7");
/// ```
pub fn group_key(variable: &str) -> &str {
    variable
        .split_once('_')
        .map_or(variable, |(head, _)| head)
}
