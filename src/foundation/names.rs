/// `true` when `name` can be joined onto a directory without leaving it: non-empty, no path
/// separators, and not `.` or `..`.
///
/// Speaker names and filter ids come straight from markup, so they are checked before being
/// turned into model or program paths.
pub(crate) fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_names_only() {
        assert!(is_plain_file_name("udisen"));
        assert!(is_plain_file_name("fembaj.sh"));
        assert!(is_plain_file_name("12"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../etc/passwd"));
        assert!(!is_plain_file_name("a\\b"));
    }
}
