use std::fmt;

use serde::{Deserialize, Serialize};

/// Supply-chain role of an actor.
///
/// Roles gate which lifecycle transitions an actor may perform; the routing
/// table lives in `hpl-gate`. `Admin` is the administrative override role
/// entitled to act on a current owner's behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Producer,
    Carrier,
    Purchaser,
    Admin,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 4] = [Role::Producer, Role::Carrier, Role::Purchaser, Role::Admin];

    /// Stable lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Carrier => "carrier",
            Role::Purchaser => "purchaser",
            Role::Admin => "admin",
        }
    }

    /// Whether this role may act on another owner's behalf.
    pub fn is_override(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
