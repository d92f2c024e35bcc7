//! Authorization Guard
//!
//! Identities are opaque principals; address formats are the hosting
//! runtime's concern. Both contracts route every identity-gated check
//! through [`authorize`] so no operation compares identities inline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Opaque, comparable, hashable principal (caller or account).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap a principal string.
    #[must_use]
    pub fn new(principal: impl Into<String>) -> Self {
        Self(principal.into())
    }

    /// Borrow the underlying principal.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(principal: &str) -> Self {
        Self::new(principal)
    }
}

impl From<String> for Identity {
    fn from(principal: String) -> Self {
        Self(principal)
    }
}

/// Pure predicate: does `caller` hold the `required` identity?
#[must_use]
pub fn authorize(caller: &Identity, required: &Identity) -> bool {
    caller == required
}

/// [`authorize`] lifted into the error taxonomy.
///
/// # Errors
///
/// Returns [`Error::Unauthorized`] when the check fails.
pub fn ensure_authorized(caller: &Identity, required: &Identity) -> Result<()> {
    if authorize(caller, required) {
        Ok(())
    } else {
        tracing::warn!(%caller, %required, "authorization denied");
        Err(Error::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    quickcheck! {
        fn prop_authorize_reflexive(principal: String) -> bool {
            let id = Identity::new(principal);
            authorize(&id, &id.clone())
        }

        fn prop_authorize_matches_equality(a: String, b: String) -> bool {
            authorize(&Identity::new(a.clone()), &Identity::new(b.clone())) == (a == b)
        }
    }

    #[test]
    fn test_ensure_authorized_denies_other_identity() {
        let owner = Identity::from("ST1OWNER");
        let intruder = Identity::from("ST2INTRUDER");

        assert!(ensure_authorized(&owner, &owner).is_ok());
        assert!(matches!(
            ensure_authorized(&intruder, &owner),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn test_identity_serializes_as_plain_string() {
        let id = Identity::from("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM\"");
    }
}
