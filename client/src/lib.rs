//! Lobby client: joins a lobby hosted by an HTTP service, keeps a polled copy
//! of its players, chat and state, and remembers the session between runs.

pub mod config;
pub mod error;
pub mod lobby;
pub mod session;
pub mod transport;
pub mod view;

pub use config::LobbyConfig;
pub use error::{LobbyError, Result};
pub use lobby::{LobbyClient, SyncHandle};
pub use session::{FileStore, MemoryStore, Session, SessionStore};
pub use transport::{HttpTransport, LobbyTransport};
pub use view::LobbyView;

/// The client as used by the `lobby` tool: real HTTP, session on disk.
pub type HttpLobbyClient = LobbyClient<HttpTransport, FileStore>;
