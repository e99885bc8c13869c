use std::time::Duration;

use shared::roster::TEAM_CAPACITY;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3001/lobby";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

// 🎮 Client-side lobby configuration
#[derive(Clone, Debug)]
pub struct LobbyConfig {
    pub endpoint: String,              // single URL, GET for snapshots and POST for actions
    pub poll_interval: Duration,       // 3s between snapshot fetches
    pub admin_username: String,        // only this user may send kick requests
    pub team_capacity: usize,          // 5 per side
    pub request_timeout: Option<Duration>, // None leaves it to reqwest
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            team_capacity: TEAM_CAPACITY,
            request_timeout: None,
        }
    }
}

impl LobbyConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_admin(mut self, username: impl Into<String>) -> Self {
        self.admin_username = username.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
