use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Content hash pointing into the metadata store.
///
/// The hashing scheme belongs to the storage network; HPL treats the token
/// as opaque and only constrains its shape so it can be embedded in URLs
/// and event payloads. The in-memory development store derives
/// `b3-<hex>` references from BLAKE3.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentRef(String);

const MAX_REF_LEN: usize = 128;

impl ContentRef {
    /// Validate an externally supplied content reference.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::InvalidContentRef("empty reference".into()));
        }
        if s.len() > MAX_REF_LEN {
            return Err(TypeError::InvalidContentRef(format!(
                "reference too long: {} exceeds {MAX_REF_LEN}",
                s.len()
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(TypeError::InvalidContentRef(format!(
                "illegal character in reference: {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Derive a reference from raw content bytes (BLAKE3).
    ///
    /// Used by the in-memory store; networked stores return whatever
    /// reference their write endpoint assigns.
    pub fn from_content(data: &[u8]) -> Self {
        Self(format!("b3-{}", hex::encode(blake3::hash(data).as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for logs.
    pub fn short(&self) -> String {
        if self.0.len() <= 12 {
            self.0.clone()
        } else {
            format!("{}..{}", &self.0[..8], &self.0[self.0.len() - 4..])
        }
    }
}

impl TryFrom<String> for ContentRef {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ContentRef> for String {
    fn from(r: ContentRef) -> Self {
        r.0
    }
}

impl fmt::Debug for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentRef({})", self.short())
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_content_is_deterministic() {
        let a = ContentRef::from_content(b"hello");
        let b = ContentRef::from_content(b"hello");
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("b3-"));
    }

    #[test]
    fn different_content_different_refs() {
        assert_ne!(
            ContentRef::from_content(b"aaa"),
            ContentRef::from_content(b"bbb")
        );
    }

    #[test]
    fn derived_refs_pass_validation() {
        let r = ContentRef::from_content(b"roundtrip");
        assert_eq!(ContentRef::parse(r.as_str()).unwrap(), r);
    }

    #[test]
    fn parse_accepts_cid_like_tokens() {
        assert!(ContentRef::parse("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").is_ok());
        assert!(ContentRef::parse("bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi").is_ok());
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        assert!(ContentRef::parse("").is_err());
        assert!(ContentRef::parse("has space").is_err());
        assert!(ContentRef::parse("slash/inside").is_err());
        assert!(ContentRef::parse(&"x".repeat(129)).is_err());
    }

    #[test]
    fn short_form_truncates() {
        let r = ContentRef::from_content(b"short");
        assert!(r.short().len() < r.as_str().len());
        let tiny = ContentRef::parse("abc").unwrap();
        assert_eq!(tiny.short(), "abc");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_never_panics(s in "\\PC*") {
                let _ = ContentRef::parse(&s);
            }

            #[test]
            fn derived_refs_always_validate(data in proptest::collection::vec(any::<u8>(), 0..256)) {
                let r = ContentRef::from_content(&data);
                prop_assert_eq!(ContentRef::parse(r.as_str()).unwrap(), r);
            }
        }
    }
}
