//! Identifier validation and class/property name derivation.
//!
//! Raw schema names (`person_address`, `PERSON_ADDRESS`, `PersonAddress`) are
//! turned into class identifiers (`PersonAddress`) and property names
//! (`personAddress`). Both transforms are deterministic and idempotent.

/// Maximum identifier length accepted in a schema document.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate a raw table, view or column name.
///
/// Rejects:
/// - Empty or whitespace-only names
/// - Names containing null bytes
/// - Names exceeding the maximum length
pub fn validate_identifier(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }

    if name.contains('\0') {
        return Err(format!("name contains a null byte: {:?}", name));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(format!(
            "name exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        ));
    }

    Ok(())
}

/// Convert a raw schema name into a class identifier.
///
/// Any non-alphanumeric character separates words. When the name has no
/// lowercase letters and contains a separator (`PERSON_ADDRESS`) each word
/// is lowercased before capitalising. Otherwise only the first letter of each
/// word is upper-cased and the rest is kept as written.
pub fn derive_class_identifier(raw: &str) -> String {
    let has_separator = raw.chars().any(|c| !c.is_alphanumeric());
    let has_lowercase = raw.chars().any(char::is_lowercase);
    let shouting = has_separator && !has_lowercase;

    let mut out = String::with_capacity(raw.len());
    for word in raw.split(|c: char| !c.is_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            if shouting {
                out.extend(chars.flat_map(char::to_lowercase));
            } else {
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

/// Convert a raw column name into a property (field) name.
pub fn derive_property_name(raw: &str) -> String {
    let class = derive_class_identifier(raw);
    if !class.chars().any(char::is_lowercase) {
        return class.to_lowercase();
    }
    let mut chars = class.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => class,
    }
}

/// Java keywords and literals that cannot be used as identifiers.
const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "var", "void", "volatile", "while", "_",
];

/// Make a derived name usable as a Java identifier.
///
/// Reserved words get a trailing `_` (`class` → `class_`); names that are
/// empty or start with a digit get a leading `_` (`1stPlace` → `_1stPlace`).
pub fn java_identifier(name: &str) -> String {
    if JAVA_RESERVED.contains(&name) {
        return format!("{}_", name);
    }
    match name.chars().next() {
        Some(c) if !c.is_ascii_digit() => name.to_string(),
        _ => format!("_{}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_identifier_escapes_reserved_and_digits() {
        assert_eq!(java_identifier("class"), "class_");
        assert_eq!(java_identifier("int"), "int_");
        assert_eq!(java_identifier("1stPlace"), "_1stPlace");
        assert_eq!(java_identifier(&derive_property_name("1st_place")), "_1stPlace");
        assert_eq!(java_identifier(""), "_");
        assert_eq!(java_identifier("Class"), "Class");
        assert_eq!(java_identifier("firstName"), "firstName");
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("person").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("   ").is_err());
        assert!(validate_identifier("bad\0name").is_err());
        assert!(validate_identifier(&"x".repeat(129)).is_err());
        assert!(validate_identifier(&"x".repeat(128)).is_ok());
    }

    #[test]
    fn test_class_identifier_from_snake_case() {
        assert_eq!(derive_class_identifier("person_address"), "PersonAddress");
        assert_eq!(derive_class_identifier("PERSON_ADDRESS"), "PersonAddress");
        assert_eq!(derive_class_identifier("person-address type"), "PersonAddressType");
        assert_eq!(derive_class_identifier("__person__"), "Person");
    }

    #[test]
    fn test_class_identifier_keeps_mixed_case() {
        assert_eq!(derive_class_identifier("PersonAddress"), "PersonAddress");
        assert_eq!(derive_class_identifier("personAddress"), "PersonAddress");
        assert_eq!(derive_class_identifier("HTTPServer"), "HTTPServer");
        assert_eq!(derive_class_identifier("PERSON"), "PERSON");
    }

    #[test]
    fn test_class_identifier_is_idempotent() {
        for raw in [
            "person_address",
            "PERSON_ADDRESS",
            "a_b",
            "person2_id",
            "HTTPServer",
            "1st_place",
            "Mixed_CASE_name",
            "",
        ] {
            let once = derive_class_identifier(raw);
            assert_eq!(derive_class_identifier(&once), once, "raw = {:?}", raw);
        }
    }

    #[test]
    fn test_property_name() {
        assert_eq!(derive_property_name("first_name"), "firstName");
        assert_eq!(derive_property_name("FIRST_NAME"), "firstName");
        assert_eq!(derive_property_name("ID"), "id");
        assert_eq!(derive_property_name("id"), "id");
        assert_eq!(derive_property_name("PersonId"), "personId");
    }
}
