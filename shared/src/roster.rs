use crate::protocol::{Player, Team};

/// Nominal number of players per team.
pub const TEAM_CAPACITY: usize = 5;

/// Players split by team tag, in the order the service returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rosters<'a> {
    pub team_a: Vec<&'a Player>,
    pub team_b: Vec<&'a Player>,
    pub unassigned: Vec<&'a Player>,
}

impl<'a> Rosters<'a> {
    pub fn partition(players: &'a [Player]) -> Self {
        let mut rosters = Rosters::default();
        for player in players {
            match player.team() {
                Some(Team::A) => rosters.team_a.push(player),
                Some(Team::B) => rosters.team_b.push(player),
                None => rosters.unassigned.push(player),
            }
        }
        rosters
    }

    pub fn team(&self, team: Team) -> &[&'a Player] {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }

    /// Empty seats left on `team`. Overfilled teams report zero.
    pub fn waiting_slots(&self, team: Team, capacity: usize) -> usize {
        capacity.saturating_sub(self.team(team).len())
    }

    /// Both teams have reached `capacity`.
    pub fn is_full(&self, capacity: usize) -> bool {
        Team::ALL
            .iter()
            .all(|team| self.team(*team).len() >= capacity)
    }

    pub fn len(&self) -> usize {
        self.team_a.len() + self.team_b.len() + self.unassigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PlayerId;

    fn ids(players: &[&Player]) -> Vec<String> {
        players.iter().map(|p| p.id.to_string()).collect()
    }

    fn team_of(count: usize, team: Team, offset: usize) -> Vec<Player> {
        (0..count)
            .map(|i| Player::new(format!("{}", offset + i), format!("p{}", offset + i)).with_team(team))
            .collect()
    }

    #[test]
    fn splits_by_team_tag() {
        let players = vec![
            Player::new("1", "CyberNinja").with_team(Team::A),
            Player::new("2", "NeonHunter").with_team(Team::B),
            Player::new("3", "QuantumGamer"),
        ];

        let rosters = Rosters::partition(&players);
        assert_eq!(ids(&rosters.team_a), vec!["1"]);
        assert_eq!(ids(&rosters.team_b), vec!["2"]);
        assert_eq!(ids(&rosters.unassigned), vec!["3"]);
    }

    #[test]
    fn rosters_are_disjoint_and_cover_everyone() {
        let tags = [None, Some(1), Some(2), Some(0), Some(7), Some(2), None, Some(1)];
        let players: Vec<Player> = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| Player {
                team_id: *tag,
                ..Player::new(i.to_string(), format!("p{i}"))
            })
            .collect();

        let rosters = Rosters::partition(&players);
        assert_eq!(rosters.len(), players.len());

        let mut seen: Vec<&PlayerId> = rosters
            .team_a
            .iter()
            .chain(&rosters.team_b)
            .chain(&rosters.unassigned)
            .map(|p| &p.id)
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), players.len());
    }

    #[test]
    fn keeps_service_order() {
        let players = vec![
            Player::new("9", "late").with_team(Team::A),
            Player::new("2", "early").with_team(Team::A),
        ];
        let rosters = Rosters::partition(&players);
        assert_eq!(ids(&rosters.team_a), vec!["9", "2"]);
    }

    #[test]
    fn full_only_when_both_teams_reach_capacity() {
        let mut players = team_of(TEAM_CAPACITY, Team::A, 0);
        players.extend(team_of(TEAM_CAPACITY, Team::B, 100));
        assert!(Rosters::partition(&players).is_full(TEAM_CAPACITY));

        players.pop();
        let rosters = Rosters::partition(&players);
        assert!(!rosters.is_full(TEAM_CAPACITY));
        assert_eq!(rosters.waiting_slots(Team::B, TEAM_CAPACITY), 1);
        assert_eq!(rosters.waiting_slots(Team::A, TEAM_CAPACITY), 0);
    }

    #[test]
    fn overfilled_team_has_no_waiting_slots() {
        let players = team_of(TEAM_CAPACITY + 1, Team::A, 0);
        let rosters = Rosters::partition(&players);
        assert_eq!(rosters.team_a.len(), 6);
        assert_eq!(rosters.waiting_slots(Team::A, TEAM_CAPACITY), 0);
        assert!(!rosters.is_full(TEAM_CAPACITY));
    }
}
