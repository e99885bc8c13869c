use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use shared::prelude::*;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::LobbyConfig;
use crate::error::{LobbyError, Result};
use crate::session::{Session, SessionStore};
use crate::transport::LobbyTransport;
use crate::view::LobbyView;

// tokio refuses a zero period
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Keeps a local copy of the lobby in step with the lobby service.
///
/// Every operation swallows its own failures: they are logged and the next
/// poll is what brings the view back in line. State-changing calls re-poll
/// as soon as they succeed.
pub struct LobbyClient<T, S> {
    config: LobbyConfig,
    transport: T,
    store: S,
    view: RwLock<LobbyView>,
    revision: watch::Sender<u64>,
}

impl<T: LobbyTransport, S: SessionStore> LobbyClient<T, S> {
    pub fn new(config: LobbyConfig, transport: T, store: S) -> Self {
        let view = LobbyView::new(config.team_capacity);
        let (revision, _) = watch::channel(0);
        Self {
            config,
            transport,
            store,
            view: RwLock::new(view),
            revision,
        }
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Copy of the current view.
    pub fn view(&self) -> LobbyView {
        self.view.read().clone()
    }

    pub fn with_view<R>(&self, f: impl FnOnce(&LobbyView) -> R) -> R {
        f(&*self.view.read())
    }

    pub fn is_joined(&self) -> bool {
        self.view.read().is_joined()
    }

    pub fn session(&self) -> Option<Session> {
        self.view.read().session.clone()
    }

    /// Ticks every time the view changes. The value is a revision counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Trusts whatever session was persisted last time, without asking the service.
    pub fn restore_session(&self) -> bool {
        match Session::load(&self.store) {
            Some(session) => {
                info!("🔑 Restored session for '{}'", session.username);
                self.view.write().session = Some(session);
                self.bump();
                true
            }
            None => {
                debug!("No saved session");
                false
            }
        }
    }

    pub async fn join(&self, username: &str, level: u32, avatar: &str) -> Option<Session> {
        if username.trim().is_empty() {
            debug!("Ignoring join with an empty username");
            return None;
        }

        match self.try_join(username, level, avatar).await {
            Ok(session) => {
                info!("🎮 Joined lobby as '{}'", session.username);
                self.poll().await;
                Some(session)
            }
            Err(e) => {
                warn!("❌ Join failed: {e}");
                None
            }
        }
    }

    async fn try_join(&self, username: &str, level: u32, avatar: &str) -> Result<Session> {
        let action = LobbyAction::Join {
            username: username.to_string(),
            level,
            avatar: avatar.to_string(),
        };
        let reply = self.transport.post_action(&action).await?;

        let session_id = reply
            .session_id
            .filter(|id| !id.is_empty())
            .ok_or(LobbyError::MissingSessionId)?;
        let session = Session::new(session_id, username);
        session.persist(&self.store)?;

        self.view.write().session = Some(session.clone());
        self.bump();
        Ok(session)
    }

    /// Fetches a snapshot and replaces the cached players, messages and lobby state.
    pub async fn poll(&self) -> bool {
        match self.transport.fetch_snapshot().await {
            Ok(snapshot) => {
                self.view.write().apply(snapshot);
                self.bump();
                true
            }
            Err(e) => {
                warn!("⚠️ Lobby poll failed: {e}");
                false
            }
        }
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.view.write().draft = text.into();
    }

    pub fn draft(&self) -> String {
        self.view.read().draft.clone()
    }

    /// Sends the chat input buffer.
    ///
    /// Nothing goes out for a blank buffer or before joining. On success the
    /// buffer is cleared and the lobby re-polled right away; on failure the
    /// text stays so it can be sent again.
    pub async fn send_message(&self) -> bool {
        let (text, session) = {
            let view = self.view.read();
            (view.draft.clone(), view.session.clone())
        };

        if text.trim().is_empty() {
            return false;
        }
        let Some(session) = session else {
            debug!("Not joined, message not sent");
            return false;
        };

        let action = LobbyAction::SendMessage {
            username: session.username,
            message: text.clone(),
            session_id: Some(session.session_id),
        };
        if let Err(e) = self.transport.post_action(&action).await {
            warn!("💬 Sending message failed: {e}");
            return false;
        }

        {
            let mut view = self.view.write();
            // a newer draft typed while the request was in flight is kept
            if view.draft == text {
                view.draft.clear();
            }
        }
        self.bump();
        self.poll().await;
        true
    }

    /// Puts `text` in the input buffer and sends it.
    pub async fn send_text(&self, text: impl Into<String>) -> bool {
        self.set_draft(text);
        self.send_message().await
    }

    pub async fn assign_to_team(&self, player_id: &PlayerId, team: Team) -> bool {
        let action = LobbyAction::AssignTeam {
            player_id: player_id.clone(),
            team_id: team,
        };
        self.mutate(action).await
    }

    /// Asks the service to remove a player.
    ///
    /// Only sent when the local username is the configured admin. This is a
    /// courtesy check; the service decides whether the kick is allowed.
    pub async fn kick_player(&self, player_id: &PlayerId) -> bool {
        let session = self.session();
        let Some(session) = session.filter(|s| s.username == self.config.admin_username) else {
            debug!("Kick of {player_id} skipped, not the admin");
            return false;
        };

        let action = LobbyAction::KickPlayer {
            player_id: player_id.clone(),
            session_id: Some(session.session_id),
        };
        self.mutate(action).await
    }

    async fn mutate(&self, action: LobbyAction) -> bool {
        match self.transport.post_action(&action).await {
            Ok(_) => {
                self.poll().await;
                true
            }
            Err(e) => {
                warn!("⚠️ {} failed: {e}", action.name());
                false
            }
        }
    }

    /// Polls now and then every `poll_interval` until the handle goes away.
    ///
    /// Each tick runs in its own task, so a slow poll never delays the next
    /// one and responses land in whatever order they arrive.
    pub fn start_sync(self: &Arc<Self>) -> SyncHandle {
        let client = Arc::clone(self);
        let period = self.config.poll_interval.max(MIN_POLL_INTERVAL);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let client = Arc::clone(&client);
                tokio::spawn(async move {
                    client.poll().await;
                });
            }
        });

        info!("🔄 Polling lobby every {:?}", period);
        SyncHandle { task }
    }
}

/// Stops the poll timer when dropped. Polls already in flight still finish.
#[derive(Debug)]
pub struct SyncHandle {
    task: JoinHandle<()>,
}

impl SyncHandle {
    pub fn stop(self) {
        // Drop does the work
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
