//! Lobby configuration.

use serde::{Deserialize, Serialize};

/// Rules applied by the lobby directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyConfig {
    /// Maximum seated players per lobby.
    pub max_players: usize,

    /// Drop the first entry of every submitted item list before
    /// validation. Browser clients send an empty placeholder in slot 0.
    pub skip_leading_item: bool,

    /// Clear every player's last answer when a new item is revealed, so a
    /// scoreboard only reflects answers to the live item. When `false`,
    /// answers persist until the player answers again.
    pub reset_answers_each_reveal: bool,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            max_players: 4,
            skip_leading_item: true,
            reset_answers_each_reveal: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_config_default() {
        let config = LobbyConfig::default();
        assert_eq!(config.max_players, 4);
        assert!(config.skip_leading_item);
        assert!(config.reset_answers_each_reveal);
    }
}
