//! Answer scoring against the live item.

use animequiz_protocol::PlayerResult;

use crate::{Lobby, LobbyError};

/// Case-insensitive exact title match. No trimming or fuzzy matching.
pub fn is_correct(answer: &str, title: &str) -> bool {
    answer.to_lowercase() == title.to_lowercase()
}

/// Records `answer` for the first player named `display_name` and returns
/// the full scoreboard.
///
/// An unknown display name records nothing but still yields the current
/// scoreboard.
///
/// # Errors
/// Returns [`LobbyError::NothingRevealed`] before the first reveal.
pub(crate) fn record_answer(
    lobby: &mut Lobby,
    display_name: &str,
    answer: &str,
) -> Result<Vec<PlayerResult>, LobbyError> {
    let title = lobby
        .live_item()
        .map(|item| item.title.clone())
        .ok_or_else(|| LobbyError::NothingRevealed(lobby.id.clone()))?;
    let lobby_id = lobby.id.clone();

    match lobby.player_named_mut(display_name) {
        Some(player) => {
            let correct = is_correct(answer, &title);
            player.last_answer = Some(answer.to_owned());
            player.last_answer_correct = Some(correct);
            tracing::debug!(lobby = %lobby_id, player = display_name, correct, "answer recorded");
        }
        None => {
            tracing::debug!(lobby = %lobby_id, player = display_name, "answer from unknown player");
        }
    }

    Ok(lobby.scoreboard())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_correct_ignores_case() {
        assert!(is_correct("bleach", "Bleach"));
        assert!(is_correct("ONE PIECE", "One Piece"));
    }

    #[test]
    fn test_is_correct_is_exact_otherwise() {
        assert!(!is_correct("bleach ", "Bleach"));
        assert!(!is_correct("Naruto Shippuden", "Naruto"));
        assert!(!is_correct("", "Naruto"));
    }
}
