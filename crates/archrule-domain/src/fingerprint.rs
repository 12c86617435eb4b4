use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a violation.
///
/// Identity fields:
/// - rule_id
/// - code
/// - subject (class or package name)
/// - message
pub fn fingerprint_for_violation(rule_id: &str, code: &str, subject: &str, message: &str) -> String {
    let canonical = [rule_id, code, subject, message].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_hex() {
        let a = fingerprint_for_violation("arch.x", "code", "a.B", "msg");
        let b = fingerprint_for_violation("arch.x", "code", "a.B", "msg");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn every_field_participates() {
        let base = fingerprint_for_violation("r", "c", "s", "m");
        assert_ne!(base, fingerprint_for_violation("r2", "c", "s", "m"));
        assert_ne!(base, fingerprint_for_violation("r", "c2", "s", "m"));
        assert_ne!(base, fingerprint_for_violation("r", "c", "s2", "m"));
        assert_ne!(base, fingerprint_for_violation("r", "c", "s", "m2"));
    }
}
