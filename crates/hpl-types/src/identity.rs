use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Opaque account identity of a supply-chain party.
///
/// HPL never manages keys or signatures; an `ActorId` is the externally
/// supplied identity string of whoever signed a ledger transaction. The
/// canonical form is `0x` followed by 40 lowercase hex characters. Parsing
/// normalizes case so two renderings of the same account compare equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(String);

impl ActorId {
    /// Parse and normalize an identity string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| TypeError::InvalidIdentity(format!("missing 0x prefix: {s}")))?;

        if body.len() != 40 {
            return Err(TypeError::InvalidIdentity(format!(
                "expected 40 hex characters, got {}",
                body.len()
            )));
        }
        if !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidIdentity(format!(
                "non-hex character in identity: {s}"
            )));
        }

        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    /// Create a random identity for tests and demos.
    pub fn random() -> Self {
        let mut bytes = [0u8; 20];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// The canonical identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for logs (`0x1234..cdef`).
    pub fn short(&self) -> String {
        format!("{}..{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl TryFrom<String> for ActorId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.short())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger transaction reference for an appended event.
///
/// Assigned by the ledger collaborator on append; `0x` + 64 hex characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventRef(String);

impl EventRef {
    /// Parse and normalize a transaction reference.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| TypeError::InvalidEventRef(format!("missing 0x prefix: {s}")))?;

        if body.len() != 64 {
            return Err(TypeError::InvalidEventRef(format!(
                "expected 64 hex characters, got {}",
                body.len()
            )));
        }
        if !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidEventRef(format!(
                "non-hex character in reference: {s}"
            )));
        }

        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    /// Build a reference from a 32-byte digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(format!("0x{}", hex::encode(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for logs.
    pub fn short(&self) -> String {
        format!("{}..{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl TryFrom<String> for EventRef {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<EventRef> for String {
    fn from(r: EventRef) -> Self {
        r.0
    }
}

impl fmt::Debug for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventRef({})", self.short())
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case() {
        let upper = ActorId::parse("0XAABBCCDDEEFF00112233445566778899AABBCCDD").unwrap();
        let lower = ActorId::parse("0xaabbccddeeff00112233445566778899aabbccdd").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = ActorId::parse("aabbccddeeff00112233445566778899aabbccdd").unwrap_err();
        assert!(matches!(err, TypeError::InvalidIdentity(_)));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(ActorId::parse("0xabc").is_err());
        assert!(ActorId::parse(&format!("0x{}", "a".repeat(41))).is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = ActorId::parse(&format!("0x{}", "g".repeat(40))).unwrap_err();
        assert!(matches!(err, TypeError::InvalidIdentity(_)));
    }

    #[test]
    fn random_ids_are_unique_and_valid() {
        let a = ActorId::random();
        let b = ActorId::random();
        assert_ne!(a, b);
        assert_eq!(ActorId::parse(a.as_str()).unwrap(), a);
    }

    #[test]
    fn short_form() {
        let id = ActorId::parse("0xaabbccddeeff00112233445566778899aabbccdd").unwrap();
        assert_eq!(id.short(), "0xaabb..ccdd");
    }

    #[test]
    fn serde_roundtrip_validates() {
        let id = ActorId::random();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ActorId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);

        let bad: Result<ActorId, _> = serde_json::from_str("\"not-an-identity\"");
        assert!(bad.is_err());
    }

    #[test]
    fn event_ref_from_digest_roundtrip() {
        let r = EventRef::from_digest([0xab; 32]);
        assert_eq!(EventRef::parse(r.as_str()).unwrap(), r);
        assert_eq!(r.as_str().len(), 66);
    }

    #[test]
    fn event_ref_rejects_actor_length() {
        assert!(EventRef::parse("0xaabbccddeeff00112233445566778899aabbccdd").is_err());
    }
}
