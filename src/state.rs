//! Application state: the challenge catalog, document stores, sessions, and
//! the optional judge client.
//!
//! This module owns:
//!   - the challenge catalog (immutable after startup: TOML bank + seeds)
//!   - the userProgress / leaderboard / userAchievements / comments stores
//!   - the session store
//!   - the optional judge client (present when JUDGE_API_KEY is set)

use std::collections::HashMap;

use tracing::{info, instrument};

use crate::achievements::AchievementStore;
use crate::comments::CommentStore;
use crate::config::load_challenge_bank_from_env;
use crate::domain::{Challenge, ChallengeSource, Difficulty};
use crate::judge::JudgeClient;
use crate::leaderboard::LeaderboardStore;
use crate::persist::snapshot_path;
use crate::progress::ProgressStore;
use crate::seeds::seed_challenges;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub challenges: HashMap<String, Challenge>,
    /// Catalog listing order (bank entries first, then seeds).
    pub order: Vec<String>,
    pub sessions: SessionStore,
    pub progress: ProgressStore,
    pub leaderboard: LeaderboardStore,
    pub achievements: AchievementStore,
    pub comments: CommentStore,
    pub judge: Option<JudgeClient>,
}

impl AppState {
    /// Build state from env: load the challenge bank, add seeds, open the
    /// stores (with DATA_DIR snapshots when configured), init the judge.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let mut catalog: Vec<Challenge> = Vec::new();
        if let Some(bank) = load_challenge_bank_from_env() {
            catalog.extend(bank.challenges.into_iter().filter_map(|c| c.into_challenge()));
        }
        catalog.extend(seed_challenges());

        let judge = JudgeClient::from_env();
        if let Some(j) = &judge {
            info!(target: "codearena_backend", base_url = %j.base_url, api_host = %j.api_host, language_id = j.language_id, "Judge enabled.");
        } else {
            info!(target: "codearena_backend", "Judge disabled (no JUDGE_API_KEY). Runs will fail with a configuration error.");
        }

        let mut state = Self::assemble(catalog, judge);
        state.progress = ProgressStore::open(snapshot_path("userProgress"));
        state.leaderboard = LeaderboardStore::open(snapshot_path("leaderboard"));
        state.achievements = AchievementStore::open(snapshot_path("userAchievements"));
        state.comments = CommentStore::open(snapshot_path("comments"));
        state
    }

    /// Assemble state around a fixed catalog with memory-only stores.
    /// `new` swaps in snapshot-backed stores afterwards; tests use this
    /// directly.
    pub(crate) fn assemble(catalog: Vec<Challenge>, judge: Option<JudgeClient>) -> Self {
        let mut challenges = HashMap::<String, Challenge>::new();
        let mut order = Vec::<String>::new();

        for c in catalog {
            let id = c.id.clone();
            // First writer wins: a bank entry shadows a seed with the same id.
            if challenges.contains_key(&id) {
                continue;
            }
            order.push(id.clone());
            challenges.insert(id, c);
        }

        // Inventory summary by difficulty/source.
        let mut count_by_diff: HashMap<Difficulty, (usize, usize)> = HashMap::new();
        for ch in challenges.values() {
            let entry = count_by_diff.entry(ch.difficulty).or_insert((0, 0));
            match ch.source {
                ChallengeSource::LocalBank => entry.0 += 1,
                ChallengeSource::Seed => entry.1 += 1,
            }
        }
        for (diff, (bank, seed)) in count_by_diff {
            info!(target: "codearena_backend", difficulty = ?diff, local_bank = bank, seed = seed, "Startup challenge inventory");
        }

        Self {
            challenges,
            order,
            sessions: SessionStore::new(),
            progress: ProgressStore::open(None),
            leaderboard: LeaderboardStore::open(None),
            achievements: AchievementStore::open(None),
            comments: CommentStore::open(None),
            judge,
        }
    }

    /// Read-only access to a challenge by id.
    pub fn get_challenge(&self, id: &str) -> Option<&Challenge> {
        self.challenges.get(id)
    }

    /// Catalog listing, optionally filtered by category and/or difficulty.
    pub fn list_challenges(
        &self,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> Vec<&Challenge> {
        self.order
            .iter()
            .filter_map(|id| self.challenges.get(id))
            .filter(|c| category.map_or(true, |cat| c.category == cat))
            .filter(|c| difficulty.map_or(true, |d| c.difficulty == d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_filters_by_category_and_difficulty() {
        let state = AppState::assemble(seed_challenges(), None);

        let all = state.list_challenges(None, None);
        assert_eq!(all.len(), state.challenges.len());

        let strings = state.list_challenges(Some("Strings"), None);
        assert!(!strings.is_empty());
        assert!(strings.iter().all(|c| c.category == "Strings"));

        let easy_strings = state.list_challenges(Some("Strings"), Some(Difficulty::Easy));
        assert!(easy_strings.iter().all(|c| c.difficulty == Difficulty::Easy));

        assert!(state.list_challenges(Some("Nonexistent"), None).is_empty());
    }

    #[test]
    fn duplicate_ids_keep_the_first_entry() {
        let mut catalog = seed_challenges();
        let mut dup = catalog[0].clone();
        dup.title = "Shadowed".into();
        catalog.push(dup);

        let state = AppState::assemble(catalog, None);
        assert_ne!(state.get_challenge("reverse-a-string").expect("challenge").title, "Shadowed");
        assert_eq!(state.order.len(), state.challenges.len());
    }
}
