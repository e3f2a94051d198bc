//! Scanner for `{name}` placeholders.
//!
//! A placeholder runs from a `{` to the next `}`. There is no nesting: in
//! `{a{b}` the captured name is `a{b`. A `{` with no closing brace after it
//! is ordinary text.

/// A placeholder occurrence inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Text between the braces
    pub name: &'a str,

    /// Byte offset of the opening brace
    pub start: usize,

    /// Byte offset just past the closing brace
    pub end: usize,
}

/// Finds all non-overlapping placeholders in `template`, left to right.
///
/// # Examples
///
/// ```
/// use request_composer::variables::scan_placeholders;
///
/// let found = scan_placeholders("users/{userId}/playlists/{playlistId}");
/// let names: Vec<_> = found.iter().map(|p| p.name).collect();
/// assert_eq!(names, vec!["userId", "playlistId"]);
/// ```
pub fn scan_placeholders(template: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(open) = template[cursor..].find('{').map(|i| cursor + i) {
        let Some(close) = template[open + 1..].find('}').map(|i| open + 1 + i) else {
            break;
        };

        found.push(Placeholder {
            name: &template[open + 1..close],
            start: open,
            end: close + 1,
        });
        cursor = close + 1;
    }

    found
}
