/// Returns true if `value` contains only characters from `[A-Za-z0-9._-]`.
///
/// Every externally supplied identifier must pass this gate before it is
/// used in a filesystem path or handed to an external command. The empty
/// string satisfies the grammar; callers reject empty owner/repo at the
/// point of use (`RepoRef::new` does).
pub fn is_safe_identifier(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
