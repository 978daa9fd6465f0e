//! Identifier handling between the string form callers see and the native
//! `Uuid` keys the store uses.

use uuid::Uuid;

/// Parse a caller-supplied identifier. `None` means the string cannot be a
/// native key, so any lookup by it is a miss.
#[must_use]
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Canonical string form of a native key.
#[must_use]
pub fn id_to_string(id: Uuid) -> String {
    id.hyphenated().to_string()
}

/// Fresh native key for a new record.
#[must_use]
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_ids_parse() {
        let id = new_id();
        assert_eq!(parse_id(&id_to_string(id)), Some(id));
        assert_eq!(parse_id(&id.simple().to_string()), Some(id));
    }

    #[test]
    fn malformed_ids_do_not_parse() {
        assert_eq!(parse_id("not-a-valid-id-format"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("12345"), None);
    }
}
