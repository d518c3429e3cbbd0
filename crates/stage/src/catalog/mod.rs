//! The fixed vocabulary of action blocks offered by the assembly palette.
//!
//! Identifiers are matched literally and case-sensitively. Strings outside the
//! catalog are still accepted by programs and the interpreter; they simply do
//! nothing.


use serde::{Deserialize, Serialize};

/// One recognized action block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionId {
    MoveXBy50,
    MoveYBy50,
    Rotate180,
    GoToOrigin,
    MoveToFixed,
    GoToRandom,
    SayHello,
    SayHelloTimed,
    IncreaseSize,
    DecreaseSize,
    Repeat,
}

/// Every action in palette order.
pub const CATALOG: [ActionId; 11] = [
    ActionId::MoveXBy50,
    ActionId::MoveYBy50,
    ActionId::Rotate180,
    ActionId::GoToOrigin,
    ActionId::MoveToFixed,
    ActionId::GoToRandom,
    ActionId::SayHello,
    ActionId::SayHelloTimed,
    ActionId::IncreaseSize,
    ActionId::DecreaseSize,
    ActionId::Repeat,
];

const LABELS: [&str; 11] = [
    "Move X by 50",
    "Move Y by 50",
    "Rotate 180",
    "Go to (0,0)",
    "Move X=50, Y=50",
    "Go to random position",
    "Say Hello",
    "Say Hello for 1 sec",
    "Increase Size",
    "Decrease Size",
    "Repeat",
];

/// The ordered palette of identifier strings.
pub fn list_actions() -> &'static [&'static str] {
    &LABELS
}

impl ActionId {
    /// The literal identifier string for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionId::MoveXBy50 => LABELS[0],
            ActionId::MoveYBy50 => LABELS[1],
            ActionId::Rotate180 => LABELS[2],
            ActionId::GoToOrigin => LABELS[3],
            ActionId::MoveToFixed => LABELS[4],
            ActionId::GoToRandom => LABELS[5],
            ActionId::SayHello => LABELS[6],
            ActionId::SayHelloTimed => LABELS[7],
            ActionId::IncreaseSize => LABELS[8],
            ActionId::DecreaseSize => LABELS[9],
            ActionId::Repeat => LABELS[10],
        }
    }

    /// Look up an identifier. Returns `None` for anything outside the catalog.
    pub fn parse(identifier: &str) -> Option<ActionId> {
        LABELS
            .iter()
            .position(|label| *label == identifier)
            .map(|i| CATALOG[i])
    }

    /// Whether the action displays a message that the timeline later clears.
    pub fn holds_message(self) -> bool {
        matches!(self, ActionId::SayHelloTimed)
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `identifier` names a catalog action.
pub fn is_known(identifier: &str) -> bool {
    ActionId::parse(identifier).is_some()
}
