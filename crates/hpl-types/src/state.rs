use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a batch.
///
/// States only ever advance through
/// `Produced → InTransit → Delivered → Consumed`; the derived `Ord` is that
/// forward order. `Consumed` is terminal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum BatchState {
    Produced,
    InTransit,
    Delivered,
    Consumed,
}

impl BatchState {
    /// All states in forward order.
    pub const ALL: [BatchState; 4] = [
        BatchState::Produced,
        BatchState::InTransit,
        BatchState::Delivered,
        BatchState::Consumed,
    ];

    /// Stable lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            BatchState::Produced => "produced",
            BatchState::InTransit => "in-transit",
            BatchState::Delivered => "delivered",
            BatchState::Consumed => "consumed",
        }
    }

    /// Returns `true` if no transition may leave this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchState::Consumed)
    }

    /// Returns `true` if `self` is strictly ahead of `other`.
    pub fn is_forward_of(&self, other: &BatchState) -> bool {
        self > other
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_forward() {
        assert!(BatchState::Produced < BatchState::InTransit);
        assert!(BatchState::InTransit < BatchState::Delivered);
        assert!(BatchState::Delivered < BatchState::Consumed);
    }

    #[test]
    fn only_consumed_is_terminal() {
        for state in BatchState::ALL {
            assert_eq!(state.is_terminal(), state == BatchState::Consumed);
        }
    }

    #[test]
    fn forward_of_is_strict() {
        assert!(BatchState::Delivered.is_forward_of(&BatchState::Produced));
        assert!(!BatchState::Produced.is_forward_of(&BatchState::Produced));
        assert!(!BatchState::Produced.is_forward_of(&BatchState::Consumed));
    }

    #[test]
    fn serde_roundtrip() {
        for state in BatchState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            let parsed: BatchState = serde_json::from_str(&json).unwrap();
            assert_eq!(state, parsed);
        }
    }
}
