//! Structure of composite codes used by the API
//!
//! School, faculty and study programme identifiers follow fixed formats.
//! These public helpers let callers check identifiers they are about to pass
//! to the client and assemble composite KOV codes from their parts. The
//! client itself sends identifiers unchecked.

use std::sync::OnceLock;

use regex::Regex;

struct Patterns {
    school: Regex,
    kov: Regex,
    kodfak: Regex,
    eduid: Regex,
    kov_school: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        school: Regex::new(r"^[0-9]{9}$").expect("school pattern is valid"),
        kov: Regex::new(r"^[0-9a-zA-Z]{7}$").expect("kov pattern is valid"),
        kodfak: Regex::new(r"^[0-9]{4}$").expect("kodfak pattern is valid"),
        eduid: Regex::new(r"^[0-9]{9}$").expect("eduid pattern is valid"),
        kov_school: Regex::new(r"^[0-9]{2}\.[0-9a-zA-Z]{9}\.[0-9a-zA-Z]{7}$")
            .expect("kov-school pattern is valid"),
    })
}

/// Nine-digit school code
pub fn is_school_code(code: &str) -> bool {
    patterns().school.is_match(code)
}

/// Seven alphanumeric KOV study programme code
pub fn is_kov_code(code: &str) -> bool {
    patterns().kov.is_match(code)
}

/// Four-digit faculty code
pub fn is_kodfak(code: &str) -> bool {
    patterns().kodfak.is_match(code)
}

/// Nine-digit EDUID
pub fn is_eduid(code: &str) -> bool {
    patterns().eduid.is_match(code)
}

/// `NN.XXXXXXXXX.XXXXXXX` study-programme-at-school code
pub fn is_kov_school_code(code: &str) -> bool {
    patterns().kov_school.is_match(code)
}

/// Joins KOV code parts, right-aligning them to widths 4, 1 and 2
pub fn kov_code(field: &str, level: &str, branch: &str) -> String {
    format!("{:>4}{:>1}{:>2}", field, level, branch)
}

/// Joins KOV-school code parts as `%2s.%9s.%7s`
pub fn kov_school_code(prefix: &str, school: &str, kov: &str) -> String {
    format!("{:>2}.{:>9}.{:>7}", prefix, school, kov)
}
