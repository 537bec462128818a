//! File-name form of taxonomy names.

/// Map a display name to a single safe path component.
///
/// Whitespace becomes `_`, path separators become `-`, and characters
/// rejected by common filesystems become `_`. Leading and trailing dots are
/// stripped so the result can never be `.` or `..`. Returns `None` when
/// nothing usable is left.
pub fn path_component(name: &str) -> Option<String> {
    let mapped: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = mapped.trim_matches('.');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
