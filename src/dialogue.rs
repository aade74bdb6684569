//! Shop input dialogue module for handling conversation state with users.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Represents the conversation state for shop text input
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ShopDialogueState {
    #[default]
    Idle,
    /// The user pressed the shop-input button; the next text message is
    /// treated as a pasted shop listing.
    AwaitingShopText,
}

/// Type alias for our shop dialogue
pub type ShopDialogue = Dialogue<ShopDialogueState, InMemStorage<ShopDialogueState>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(ShopDialogueState::default(), ShopDialogueState::Idle);
    }
}
