//! Command identifiers derived from the invoked program path

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Leading run of non-letters followed by at least one more character.
static LEADING_NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([^a-z_]+)(.+)$").expect("valid regex"));

/// File name component of `program`, e.g. `export-users.sh`.
pub fn base_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name of `program` without its last extension, e.g. `export-users`.
pub fn file_stem(program: &str) -> String {
    Path::new(program)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Underscores are namespace separators and are dropped; a leading run of
/// non-letters (typically digits) moves to the end, since class names
/// derived from the identifier cannot start with one.
pub fn normalize(raw: &str) -> String {
    let stripped = raw.replace('_', "");
    LEADING_NON_ALPHA.replace(&stripped, "$2$1").into_owned()
}

/// Both lookup candidates for `program`, in resolution order.
pub fn candidate_identifiers(program: &str) -> [String; 2] {
    [normalize(&base_name(program)), normalize(&file_stem(program))]
}

/// `export-users` → `ExportUsers`: hyphens split words, each word gets an
/// upper-case first letter, the rest is kept as is.
pub fn to_class_stem(identifier: &str) -> String {
    identifier
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bin/export-users.sh", ["export-users.sh", "export-users"])]
    #[case("/usr/local/bin/report", ["report", "report"])]
    #[case("./01-import.php", ["import.php01-", "import01-"])]
    #[case("cli/user_sync.sh", ["usersync.sh", "usersync"])]
    #[case("", ["", ""])]
    fn given_program_path_when_candidates_then_normalized(
        #[case] program: &str,
        #[case] expected: [&str; 2],
    ) {
        let candidates = candidate_identifiers(program);
        assert_eq!(candidates, expected.map(String::from));
    }

    #[rstest]
    #[case("2fa", "fa2")]
    #[case("123", "312")]
    #[case("deploy", "deploy")]
    #[case("a1", "a1")]
    fn given_identifier_when_normalize_then_leading_digits_moved(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(raw), expected);
    }

    #[rstest]
    #[case("export-users", "ExportUsers")]
    #[case("report", "Report")]
    #[case("import01-", "Import01")]
    #[case("sync.sh", "Sync.sh")]
    fn given_identifier_when_to_class_stem_then_capitalized(#[case] id: &str, #[case] expected: &str) {
        assert_eq!(to_class_stem(id), expected);
    }
}
