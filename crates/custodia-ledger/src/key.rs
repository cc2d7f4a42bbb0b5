//! Composite-key namespacing.
//!
//! Two entity kinds share one flat key space. Audit entries are keyed by
//! their raw id; every other kind is written under a tagged composite key
//! so ids can never alias across kinds. The tag prefix is the sole
//! isolation mechanism, so it must be applied uniformly at read and write
//! time.

/// Namespace tag for user records.
pub const USER_KIND: &str = "USER";

/// Builds the composite key for a namespaced record.
///
/// The key shape is `{kind}~{id}~`. The trailing separator keeps a key
/// from being a prefix of another key of the same kind (`user-1` vs
/// `user-10`).
///
/// # Examples
///
/// ```rust
/// use custodia_ledger::{composite_key, USER_KIND};
///
/// assert_eq!(composite_key(USER_KIND, "user-alice"), "USER~user-alice~");
/// ```
#[must_use]
pub fn composite_key(kind: &str, id: &str) -> String {
    format!("{kind}~{id}~")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_key_shape() {
        assert_eq!(composite_key("USER", "user-alice"), "USER~user-alice~");
    }

    #[test]
    fn test_composite_key_never_equals_raw_id() {
        // A user id written under the USER namespace cannot collide with an
        // audit entry stored under the same raw id.
        let id = "shared-id";
        assert_ne!(composite_key(USER_KIND, id), id);
    }

    #[test]
    fn test_composite_key_distinct_per_kind() {
        assert_ne!(
            composite_key("USER", "record-1"),
            composite_key("AUDIT", "record-1")
        );
    }

    #[test]
    fn test_trailing_separator_prevents_prefix_aliasing() {
        let shorter = composite_key(USER_KIND, "user-1");
        let longer = composite_key(USER_KIND, "user-10");
        assert!(!longer.starts_with(&shorter));
    }
}
