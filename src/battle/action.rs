use serde::{Deserialize, Serialize};

/// What a side does on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldAction {
    /// Use the move in this slot (0..=3).
    UseMove(usize),
    /// Send in the party member at this index.
    SwitchTo(usize),
}

impl FieldAction {
    pub fn is_switch(&self) -> bool {
        matches!(self, FieldAction::SwitchTo(_))
    }
}
