use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// Default values the lobby service applies when a join omits them
pub const DEFAULT_LEVEL: u32 = 1;
pub const DEFAULT_AVATAR: &str = "🎮";
pub const DEFAULT_MAX_PLAYERS: u32 = 10;

// The service hands out database row ids as numbers, older deployments as strings.
fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

// Opaque player identifier, always kept in string form on the client
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        id_from_number_or_string(deserializer).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// Presence status shown next to each player
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Online,
    #[serde(rename = "ingame")]
    InGame,
    Away,
    /// Anything the service sends that we do not know about.
    #[default]
    #[serde(other)]
    Offline,
}

impl PlayerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerStatus::Online => "Online",
            PlayerStatus::InGame => "In game",
            PlayerStatus::Away => "Away",
            PlayerStatus::Offline => "Offline",
        }
    }
}

/// One of the two sides a player can be sorted into.
///
/// On the wire a team is its numeric identifier (`1` or `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    pub fn id(self) -> i64 {
        match self {
            Team::A => 1,
            Team::B => 2,
        }
    }

    pub fn from_id(id: i64) -> Option<Team> {
        match id {
            1 => Some(Team::A),
            2 => Some(Team::B),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => f.write_str("Team A"),
            Team::B => f.write_str("Team B"),
        }
    }
}

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "1" => Ok(Team::A),
            "b" | "2" => Ok(Team::B),
            other => Err(format!("unknown team '{other}', expected a, b, 1 or 2")),
        }
    }
}

impl Serialize for Team {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.id())
    }
}

impl<'de> Deserialize<'de> for Team {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = i64::deserialize(deserializer)?;
        Team::from_id(id)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid team id {id}")))
    }
}

fn default_level() -> u32 {
    DEFAULT_LEVEL
}

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

fn default_max_players() -> u32 {
    DEFAULT_MAX_PLAYERS
}

// Empty database columns come through as `null`, treat them like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::deserialize(deserializer)?.unwrap_or_else(default_level))
}

fn null_as_default_avatar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::deserialize(deserializer)?.unwrap_or_else(default_avatar))
}

fn null_as_default_max_players<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<u32, D::Error> {
    Ok(Option::deserialize(deserializer)?.unwrap_or_else(default_max_players))
}

// Player row as returned by the lobby service
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: PlayerStatus,
    #[serde(default = "default_level", deserialize_with = "null_as_default_level")]
    pub level: u32,
    #[serde(
        rename = "avatar_emoji",
        alias = "avatar",
        default = "default_avatar",
        deserialize_with = "null_as_default_avatar"
    )]
    pub avatar: String,
    /// Raw team tag. Only `1` and `2` name a team, see [`Player::team`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_color: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub joined_at: String,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            status: PlayerStatus::Online,
            level: DEFAULT_LEVEL,
            avatar: default_avatar(),
            team_id: None,
            team_name: None,
            team_color: None,
            is_admin: false,
            joined_at: String::new(),
        }
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.team_id = Some(team.id());
        self
    }

    /// The team this player is on, `None` when they sit in the lobby pool.
    pub fn team(&self) -> Option<Team> {
        self.team_id.and_then(Team::from_id)
    }
}

// Chat line, immutable once the service stored it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub username: String,
    pub message: String,
    #[serde(default, alias = "timestamp", deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LobbyState {
    #[serde(default, alias = "started", deserialize_with = "null_as_default")]
    pub game_started: bool,
    #[serde(
        default = "default_max_players",
        deserialize_with = "null_as_default_max_players"
    )]
    pub max_players: u32,
}

impl Default for LobbyState {
    fn default() -> Self {
        Self {
            game_started: false,
            max_players: DEFAULT_MAX_PLAYERS,
        }
    }
}

// Full lobby state returned by a GET on the lobby endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<Player>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<ChatMessage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lobby: LobbyState,
}

// State-changing requests, POSTed as JSON tagged by `action`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LobbyAction {
    Join {
        username: String,
        level: u32,
        avatar: String,
    },
    SendMessage {
        username: String,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },
    AssignTeam {
        player_id: PlayerId,
        team_id: Team,
    },
    KickPlayer {
        player_id: PlayerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },
}

impl LobbyAction {
    /// Wire name of the action, handy for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            LobbyAction::Join { .. } => "join",
            LobbyAction::SendMessage { .. } => "send_message",
            LobbyAction::AssignTeam { .. } => "assign_team",
            LobbyAction::KickPlayer { .. } => "kick_player",
        }
    }
}

// Reply to any POST. Error statuses only carry `error`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn player_row_from_service() {
        let row = json!({
            "id": 7,
            "username": "NeonHunter",
            "session_id": "3f0c",
            "status": "ingame",
            "level": 42,
            "avatar_emoji": "⚡",
            "team_id": 2,
            "team_name": "Blue",
            "team_color": "#00f",
            "joined_at": "2025-01-01 10:00:00"
        });

        let player: Player = serde_json::from_value(row).unwrap();
        assert_eq!(player.id, PlayerId::new("7"));
        assert_eq!(player.status, PlayerStatus::InGame);
        assert_eq!(player.avatar, "⚡");
        assert_eq!(player.team(), Some(Team::B));
        assert_eq!(player.team_name.as_deref(), Some("Blue"));
        assert!(!player.is_admin);
    }

    #[test]
    fn sparse_player_gets_defaults() {
        let player: Player =
            serde_json::from_value(json!({"id": "abc", "username": "x", "team_id": null})).unwrap();
        assert_eq!(player.level, DEFAULT_LEVEL);
        assert_eq!(player.avatar, DEFAULT_AVATAR);
        assert_eq!(player.status, PlayerStatus::Offline);
        assert_eq!(player.team(), None);
    }

    #[test]
    fn null_columns_take_defaults() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "players": [{
                "id": 3,
                "username": "QuantumGamer",
                "status": null,
                "level": null,
                "avatar_emoji": null,
                "team_id": null,
                "team_name": null,
                "team_color": null,
                "is_admin": null,
                "joined_at": null
            }],
            "messages": [{"id": 1, "username": "QuantumGamer", "message": "hi", "created_at": null}],
            "lobby": {"game_started": null, "max_players": null}
        }))
        .unwrap();

        let player = &snapshot.players[0];
        assert!(!player.is_admin);
        assert_eq!(player.level, DEFAULT_LEVEL);
        assert_eq!(player.avatar, DEFAULT_AVATAR);
        assert_eq!(player.status, PlayerStatus::Offline);
        assert_eq!(player.joined_at, "");
        assert_eq!(snapshot.messages[0].created_at, "");
        assert_eq!(snapshot.lobby, LobbyState::default());
    }

    #[test]
    fn null_lists_are_empty() {
        let snapshot: Snapshot =
            serde_json::from_value(json!({"players": null, "messages": null, "lobby": null}))
                .unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn unknown_status_falls_back_to_offline() {
        let player: Player =
            serde_json::from_value(json!({"id": 1, "username": "x", "status": "dnd"})).unwrap();
        assert_eq!(player.status, PlayerStatus::Offline);
        assert_eq!(player.status.label(), "Offline");
    }

    #[test]
    fn odd_team_ids_mean_unassigned() {
        for raw in [0, 3, -1] {
            let player = Player {
                team_id: Some(raw),
                ..Player::new("1", "x")
            };
            assert_eq!(player.team(), None, "team_id {raw}");
        }
    }

    #[test]
    fn actions_are_tagged() {
        let join = LobbyAction::Join {
            username: "GamerPro".into(),
            level: 3,
            avatar: "🚀".into(),
        };
        assert_eq!(
            serde_json::to_value(&join).unwrap(),
            json!({"action": "join", "username": "GamerPro", "level": 3, "avatar": "🚀"})
        );

        let assign = LobbyAction::AssignTeam {
            player_id: PlayerId::new("4"),
            team_id: Team::A,
        };
        assert_eq!(
            serde_json::to_value(&assign).unwrap(),
            json!({"action": "assign_team", "player_id": "4", "team_id": 1})
        );
        assert_eq!(assign.name(), "assign_team");
    }

    #[test]
    fn empty_lobby_row_defaults() {
        let snapshot: Snapshot =
            serde_json::from_value(json!({"players": [], "messages": [], "lobby": {}})).unwrap();
        assert_eq!(snapshot.lobby, LobbyState::default());
    }

    #[test]
    fn error_reply_parses() {
        let reply: ActionResponse =
            serde_json::from_value(json!({"error": "Lobby is full"})).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("Lobby is full"));
    }

    #[test]
    fn team_from_cli_text() {
        assert_eq!("a".parse::<Team>(), Ok(Team::A));
        assert_eq!(" 2 ".parse::<Team>(), Ok(Team::B));
        assert!("c".parse::<Team>().is_err());
    }
}
