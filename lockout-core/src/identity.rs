//! Normalized login identifiers.
//!
//! Every tracker lookup goes through [`IdentityKey`], so `Foo@Bar.com` and
//! ` foo@bar.com ` share one attempt record.

use std::fmt;

use serde::Serialize;

/// A trimmed, case-folded login identifier used as the tracker's map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Normalize a raw identifier.
    ///
    /// Returns `None` when nothing is left after trimming. Callers treat that
    /// as "no record" so a bad input can never lock anyone out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockout_core::IdentityKey;
    ///
    /// let a = IdentityKey::parse("Foo@Bar.com").unwrap();
    /// let b = IdentityKey::parse(" foo@bar.com ").unwrap();
    /// assert_eq!(a, b);
    /// assert!(IdentityKey::parse("   ").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdentityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
