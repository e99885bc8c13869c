use shared::prelude::*;

use crate::session::Session;

// 🏠 Everything a front-end needs to draw the lobby
#[derive(Debug, Clone, PartialEq)]
pub struct LobbyView {
    pub players: Vec<Player>,
    pub messages: Vec<ChatMessage>,
    pub lobby: LobbyState,
    /// Chat input buffer.
    pub draft: String,
    pub session: Option<Session>,
    pub team_capacity: usize,
}

impl LobbyView {
    pub fn new(team_capacity: usize) -> Self {
        Self {
            players: Vec::new(),
            messages: Vec::new(),
            lobby: LobbyState::default(),
            draft: String::new(),
            session: None,
            team_capacity,
        }
    }

    /// Throws away the cached lists and takes the service's view wholesale.
    pub fn apply(&mut self, snapshot: Snapshot) {
        self.players = snapshot.players;
        self.messages = snapshot.messages;
        self.lobby = snapshot.lobby;
    }

    pub fn is_joined(&self) -> bool {
        self.session.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    pub fn rosters(&self) -> Rosters<'_> {
        Rosters::partition(&self.players)
    }

    pub fn waiting_slots(&self, team: Team) -> usize {
        self.rosters().waiting_slots(team, self.team_capacity)
    }

    pub fn is_full(&self) -> bool {
        self.rosters().is_full(self.team_capacity)
    }

    pub fn online_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.status == PlayerStatus::Online)
            .count()
    }

    /// The local player's row, if the last snapshot contained it.
    pub fn me(&self) -> Option<&Player> {
        let username = self.username()?;
        self.players.iter().find(|p| p.username == username)
    }
}

impl Default for LobbyView {
    fn default() -> Self {
        Self::new(TEAM_CAPACITY)
    }
}
