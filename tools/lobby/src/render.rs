use std::fmt::Write;

use cyber_lobby_client::LobbyView;
use shared::prelude::*;

pub const LOBBY_FULL: &str = "🔒 LOBBY FULL";
const WAITING: &str = "… waiting for player";

// Plain-text picture of the lobby, redrawn after every poll
pub fn render(view: &LobbyView) -> String {
    let mut out = String::new();
    let rosters = view.rosters();

    let _ = writeln!(
        out,
        "🎮 CYBER LOBBY  |  {} online  |  {}/{} players{}",
        view.online_count(),
        view.players.len(),
        view.lobby.max_players,
        if view.lobby.game_started { "  |  GAME STARTED" } else { "" }
    );
    if view.is_full() {
        let _ = writeln!(out, "{LOBBY_FULL}");
    }

    for team in Team::ALL {
        let members = rosters.team(team);
        let _ = writeln!(out, "\n{team} ({}/{})", members.len(), view.team_capacity);
        for player in members {
            let _ = writeln!(out, "  {}", player_line(player));
        }
        for _ in 0..view.waiting_slots(team) {
            let _ = writeln!(out, "  {WAITING}");
        }
    }

    let _ = writeln!(out, "\nLobby pool ({})", rosters.unassigned.len());
    for player in &rosters.unassigned {
        let _ = writeln!(out, "  {}", player_line(player));
    }

    let _ = writeln!(out, "\nChat");
    for message in &view.messages {
        let _ = writeln!(
            out,
            "  [{}] {}: {}",
            message.created_at, message.username, message.message
        );
    }

    match view.username() {
        Some(username) => {
            let _ = writeln!(out, "\nYou are {username}");
        }
        None => {
            let _ = writeln!(out, "\nNot joined");
        }
    }
    out
}

fn player_line(player: &Player) -> String {
    format!(
        "{} {}  LVL {}  {}{}  [id {}]",
        player.avatar,
        player.username,
        player.level,
        player.status.label(),
        if player.is_admin { "  ★" } else { "" },
        player.id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyber_lobby_client::Session;

    fn view_with(team_a: usize, team_b: usize, pool: usize) -> LobbyView {
        let mut players = Vec::new();
        for i in 0..team_a {
            players.push(Player::new(format!("a{i}"), format!("alpha{i}")).with_team(Team::A));
        }
        for i in 0..team_b {
            players.push(Player::new(format!("b{i}"), format!("bravo{i}")).with_team(Team::B));
        }
        for i in 0..pool {
            players.push(Player::new(format!("p{i}"), format!("pool{i}")));
        }

        let mut view = LobbyView::default();
        view.apply(Snapshot {
            players,
            ..Default::default()
        });
        view
    }

    #[test]
    fn full_banner_appears_and_goes_away() {
        assert!(render(&view_with(5, 5, 0)).contains(LOBBY_FULL));
        assert!(!render(&view_with(4, 5, 1)).contains(LOBBY_FULL));
    }

    #[test]
    fn placeholders_fill_open_seats() {
        let text = render(&view_with(2, 5, 0));
        assert_eq!(text.matches(WAITING).count(), 3);
        assert!(text.contains("Team A (2/5)"));
    }

    #[test]
    fn shows_who_we_are() {
        let mut view = view_with(0, 0, 1);
        assert!(render(&view).contains("Not joined"));

        view.session = Some(Session::new("s", "pool0"));
        let text = render(&view);
        assert!(text.contains("You are pool0"));
        assert!(text.contains("Lobby pool (1)"));
    }
}
