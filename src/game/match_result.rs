//! Match result and ranking
//!
//! Summarizes a match for the end screen. Tanks never leave the match, so
//! ranking is purely by combat record.

use serde::{Deserialize, Serialize};

use crate::game::state::{GameState, TankId};

/// Match result information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Top-ranked tank, if anyone scored a kill
    pub winner_id: Option<TankId>,
    pub winner_name: Option<String>,
    pub rankings: Vec<TankRanking>,
    /// Simulated seconds played
    pub match_duration: f32,
    pub total_kills: u32,
    pub player_score: u32,
    pub player_kills: u32,
}

/// Tank ranking in match results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankRanking {
    pub tank_id: TankId,
    pub name: String,
    pub rank: u32,
    pub kills: u32,
    pub deaths: u32,
    pub is_player: bool,
}

/// Rank tanks by kills (desc), deaths (asc), then name
pub fn summarize(state: &GameState) -> MatchResult {
    let mut rankings: Vec<TankRanking> = state
        .tanks
        .iter()
        .map(|t| TankRanking {
            tank_id: t.id,
            name: t.name.clone(),
            rank: 0,
            kills: t.kills,
            deaths: t.deaths,
            is_player: t.is_player,
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.kills
            .cmp(&a.kills)
            .then_with(|| a.deaths.cmp(&b.deaths))
            .then_with(|| a.name.cmp(&b.name))
    });

    for (i, ranking) in rankings.iter_mut().enumerate() {
        ranking.rank = (i + 1) as u32;
    }

    let total_kills: u32 = rankings.iter().map(|r| r.kills).sum();

    let (winner_id, winner_name) = match rankings.first() {
        Some(first) if first.kills > 0 => (Some(first.tank_id), Some(first.name.clone())),
        _ => (None, None),
    };

    MatchResult {
        winner_id,
        winner_name,
        rankings,
        match_duration: state.elapsed,
        total_kills,
        player_score: state.score,
        player_kills: state.player().map_or(0, |p| p.kills),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Arena;
    use crate::util::vec2::Vec2;

    fn add(state: &mut GameState, name: &str, is_player: bool, kills: u32, deaths: u32) {
        let id = state.add_tank(name, is_player, Vec2::ZERO);
        let tank = state.get_tank_mut(id).unwrap();
        tank.kills = kills;
        tank.deaths = deaths;
    }

    #[test]
    fn test_ranking_order() {
        let mut state = GameState::new(Arena::default());
        add(&mut state, "Player", true, 3, 2);
        add(&mut state, "Storm", false, 5, 4);
        add(&mut state, "Viper", false, 3, 1);
        add(&mut state, "Alpha-7", false, 3, 1);

        let result = summarize(&state);
        let names: Vec<_> = result.rankings.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, ["Storm", "Alpha-7", "Viper", "Player"]);
        assert_eq!(result.rankings[0].rank, 1);
        assert_eq!(result.rankings[3].rank, 4);
        assert_eq!(result.winner_name.as_deref(), Some("Storm"));
    }

    #[test]
    fn test_no_kills_no_winner() {
        let mut state = GameState::new(Arena::default());
        add(&mut state, "Player", true, 0, 0);
        add(&mut state, "Storm", false, 0, 0);

        let result = summarize(&state);
        assert!(result.winner_id.is_none());
        assert_eq!(result.rankings.len(), 2);
    }

    #[test]
    fn test_totals_and_player_stats() {
        let mut state = GameState::new(Arena::default());
        add(&mut state, "Player", true, 2, 0);
        add(&mut state, "Storm", false, 1, 2);
        state.score = 250;
        state.elapsed = 42.5;

        let result = summarize(&state);
        assert_eq!(result.total_kills, 3);
        assert_eq!(result.player_kills, 2);
        assert_eq!(result.player_score, 250);
        assert_eq!(result.match_duration, 42.5);
    }
}
