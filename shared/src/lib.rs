//! Wire types shared by the lobby client and its tools.

pub mod protocol;
pub mod roster;

pub mod prelude {
    pub use crate::protocol::{
        ActionResponse, ChatMessage, LobbyAction, LobbyState, Player, PlayerId, PlayerStatus,
        Snapshot, Team,
    };
    pub use crate::roster::{Rosters, TEAM_CAPACITY};
}
