//! Server configuration, layered from defaults and environment variables.

use std::fmt;

use animequiz_lobby::LobbyConfig;
use animequiz_round::RevealConfig;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};

use crate::AnimeQuizError;

/// Who receives lobby membership notifications (`lobbyCreated`,
/// `updatePlayersList`, `removeLobby`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fanout {
    /// Every open connection, so lobby browsers stay current.
    #[default]
    Global,
    /// Only the lobby's seated players. A deleted lobby is reported to
    /// the player whose leave deleted it.
    Lobby,
}

impl fmt::Display for Fanout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Lobby => write!(f, "lobby"),
        }
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub fanout: Fanout,
    pub lobby: LobbyConfig,
    #[serde(with = "reveal_secs")]
    pub reveal: RevealConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4001,
            fanout: Fanout::default(),
            lobby: LobbyConfig::default(),
            reveal: RevealConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, ready for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The provider stack [`from_env`](Self::from_env) extracts from.
    ///
    /// Later layers win: defaults, then `HOST`/`PORT`, then every
    /// `ANIMEQUIZ_`-prefixed variable. A double underscore reaches into a
    /// nested table.
    ///
    /// | variable                                    | default   |
    /// |---------------------------------------------|-----------|
    /// | `HOST`                                      | `0.0.0.0` |
    /// | `PORT`                                      | `4001`    |
    /// | `ANIMEQUIZ_FANOUT`                          | `global`  |
    /// | `ANIMEQUIZ_LOBBY__MAX_PLAYERS`              | `4`       |
    /// | `ANIMEQUIZ_LOBBY__SKIP_LEADING_ITEM`        | `true`    |
    /// | `ANIMEQUIZ_LOBBY__RESET_ANSWERS_EACH_REVEAL`| `true`    |
    /// | `ANIMEQUIZ_REVEAL__DELAY_SECS`              | `10`      |
    /// | `ANIMEQUIZ_REVEAL__CADENCE_SECS`            | `30`      |
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::raw().only(&["host", "port"]))
            .merge(Env::prefixed("ANIMEQUIZ_").split("__"))
    }

    /// Reads the process environment.
    ///
    /// # Errors
    /// Returns [`AnimeQuizError::Config`] if a variable does not fit its
    /// field.
    pub fn from_env() -> Result<Self, AnimeQuizError> {
        Ok(Self::figment().extract()?)
    }
}

/// Reveal timing as whole seconds: `{ delay_secs, cadence_secs }`.
mod reveal_secs {
    use animequiz_round::RevealConfig;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct RevealSecs {
        delay_secs: u64,
        cadence_secs: u64,
    }

    pub fn serialize<S>(config: &RevealConfig, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RevealSecs {
            delay_secs: config.initial_delay.as_secs(),
            cadence_secs: config.cadence.as_secs(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<RevealConfig, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = RevealSecs::deserialize(deserializer)?;
        Ok(RevealConfig::from_secs(secs.delay_secs, secs.cadence_secs))
    }
}
