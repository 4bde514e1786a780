use hpl_types::{BatchState, Role};

/// One legal transition in the transfer routing table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferRoute {
    /// Role of the current owner moving the batch.
    pub sender: Role,
    /// State the batch must currently be in.
    pub from: BatchState,
    /// Role of the receiving party.
    pub recipient: Role,
    /// State the batch enters on transfer.
    pub next: BatchState,
}

/// Every legal transfer. Anything not listed is ineligible.
///
/// `Consumed` is terminal and intentionally absent as a `from` state;
/// consumption itself goes through `mark_consumed`, not a transfer route.
pub const ROUTES: &[TransferRoute] = &[
    // A producer hands off either to a carrier for transport or directly
    // to a purchaser.
    TransferRoute {
        sender: Role::Producer,
        from: BatchState::Produced,
        recipient: Role::Carrier,
        next: BatchState::InTransit,
    },
    TransferRoute {
        sender: Role::Producer,
        from: BatchState::Produced,
        recipient: Role::Purchaser,
        next: BatchState::Delivered,
    },
    // A carrier completes the final hop to a purchaser.
    TransferRoute {
        sender: Role::Carrier,
        from: BatchState::InTransit,
        recipient: Role::Purchaser,
        next: BatchState::Delivered,
    },
    // Resale between purchasers; ownership moves, state stays delivered.
    TransferRoute {
        sender: Role::Purchaser,
        from: BatchState::Delivered,
        recipient: Role::Purchaser,
        next: BatchState::Delivered,
    },
];

/// Look up the state a transfer enters, or `None` if no route allows it.
pub fn next_state(sender: Role, from: BatchState, recipient: Role) -> Option<BatchState> {
    ROUTES
        .iter()
        .find(|r| r.sender == sender && r.from == from && r.recipient == recipient)
        .map(|r| r.next)
}

/// The state implied by handing a batch to a recipient of this role,
/// independent of where it currently is. Used by callers building a
/// transfer request.
pub fn implied_state(recipient: Role) -> Option<BatchState> {
    match recipient {
        Role::Carrier => Some(BatchState::InTransit),
        Role::Purchaser => Some(BatchState::Delivered),
        Role::Producer | Role::Admin => None,
    }
}
