//! Application state and the reducer that evolves it
//!
//! `reduce` is pure: it consumes the current state and an action and returns
//! the next state plus the side effects the caller must run. All mutation of
//! dashboard state goes through it, one action at a time.

use crate::{
    favorites::Favorites,
    filter::{project, ListQuery, SortOrder},
    route::Route,
    types::{Coin, CoinDetail},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one detail fetch. Results carrying any other token are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchToken(pub u64);

/// Identifies one polling session. Poll results from an earlier session are
/// dropped, so nothing queued before `shutdown` lands afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PollGeneration(pub u64);

/// What the detail view currently shows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum DetailState {
    /// No detail view is open
    #[default]
    Idle,
    /// A fetch for `id` is outstanding
    Loading { id: String, token: FetchToken },
    /// The record arrived
    Loaded(CoinDetail),
    /// The fetch failed or returned nothing
    NotFound { id: String },
}

/// The whole dashboard state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Latest market list, in provider order
    pub coins: Vec<Coin>,
    /// When `coins` was last replaced
    pub last_updated: Option<DateTime<Utc>>,
    /// True until the first poll settles
    pub loading: bool,
    /// Error from the most recent poll, cleared by the next success
    pub last_error: Option<String>,
    pub favorites: Favorites,
    pub search_term: String,
    pub sort: Option<SortOrder>,
    pub favorites_only: bool,
    pub route: Route,
    pub detail: DetailState,
    poll_generation: PollGeneration,
    next_token: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Favorites::new())
    }
}

impl AppState {
    /// Initial state with previously persisted favorites
    pub fn new(favorites: Favorites) -> Self {
        Self {
            coins: Vec::new(),
            last_updated: None,
            loading: true,
            last_error: None,
            favorites,
            search_term: String::new(),
            sort: None,
            favorites_only: false,
            route: Route::List,
            detail: DetailState::Idle,
            poll_generation: PollGeneration::default(),
            next_token: 0,
        }
    }

    /// The list the user currently sees
    pub fn visible_coins(&self) -> Vec<&Coin> {
        project(
            &self.coins,
            ListQuery {
                search_term: &self.search_term,
                favorites: &self.favorites,
                favorites_only: self.favorites_only,
                sort: self.sort,
            },
        )
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Generation poll results must carry to be applied
    pub fn poll_generation(&self) -> PollGeneration {
        self.poll_generation
    }

    /// Token of the outstanding detail fetch, if any
    pub fn pending_token(&self) -> Option<FetchToken> {
        match &self.detail {
            DetailState::Loading { token, .. } => Some(*token),
            _ => None,
        }
    }
}

/// Everything that can change the state
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A polling session began; results from older sessions become stale
    PollingStarted,
    /// Polling was cancelled; everything still queued from it is stale
    PollingStopped,
    /// A poll succeeded
    CoinsLoaded {
        generation: PollGeneration,
        coins: Vec<Coin>,
        fetched_at: DateTime<Utc>,
    },
    /// A poll failed
    PollFailed {
        generation: PollGeneration,
        error: String,
    },
    SearchChanged(String),
    ToggleFavorite(String),
    SortChanged(Option<SortOrder>),
    FavoritesOnlyChanged(bool),
    Navigate(Route),
    /// A detail fetch returned a record
    DetailLoaded {
        token: FetchToken,
        detail: Box<CoinDetail>,
    },
    /// A detail fetch failed or found nothing
    DetailFailed { token: FetchToken, error: String },
}

/// Side effects requested by the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start a detail fetch tagged with `token`
    FetchDetail { id: String, token: FetchToken },
    /// Write the favorites set to storage
    PersistFavorites(Favorites),
}

/// Applies `action` to `state`
pub fn reduce(mut state: AppState, action: Action) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();

    match action {
        Action::PollingStarted | Action::PollingStopped => {
            state.poll_generation.0 += 1;
        }
        Action::CoinsLoaded {
            generation,
            coins,
            fetched_at,
        } => {
            if generation == state.poll_generation {
                state.coins = coins;
                state.last_updated = Some(fetched_at);
                state.loading = false;
                state.last_error = None;
            }
        }
        Action::PollFailed { generation, error } => {
            if generation == state.poll_generation {
                state.loading = false;
                state.last_error = Some(error);
            }
        }
        Action::SearchChanged(term) => {
            state.search_term = term;
        }
        Action::ToggleFavorite(id) => {
            state.favorites.toggle(&id);
            effects.push(Effect::PersistFavorites(state.favorites.clone()));
        }
        Action::SortChanged(sort) => {
            state.sort = sort;
        }
        Action::FavoritesOnlyChanged(only) => {
            state.favorites_only = only;
        }
        Action::Navigate(route) => {
            state.detail = match &route {
                Route::List => DetailState::Idle,
                Route::Coin(id) => {
                    let token = FetchToken(state.next_token);
                    state.next_token += 1;
                    effects.push(Effect::FetchDetail {
                        id: id.clone(),
                        token,
                    });
                    DetailState::Loading {
                        id: id.clone(),
                        token,
                    }
                }
            };
            state.route = route;
        }
        Action::DetailLoaded { token, detail } => {
            if state.pending_token() == Some(token) {
                state.detail = DetailState::Loaded(*detail);
            }
        }
        Action::DetailFailed { token, .. } => {
            if state.pending_token() == Some(token) {
                if let DetailState::Loading { id, .. } = std::mem::take(&mut state.detail) {
                    state.detail = DetailState::NotFound { id };
                }
            }
        }
    }

    (state, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::sample_coins;

    fn apply(state: AppState, action: Action) -> AppState {
        reduce(state, action).0
    }

    fn loaded(coins: Vec<Coin>) -> Action {
        Action::CoinsLoaded {
            generation: PollGeneration::default(),
            coins,
            fetched_at: Utc::now(),
        }
    }

    fn failed(error: &str) -> Action {
        Action::PollFailed {
            generation: PollGeneration::default(),
            error: error.into(),
        }
    }

    #[test]
    fn test_poll_replaces_collection_wholesale() {
        let first = sample_coins("a", 100);
        let second = sample_coins("b", 100);

        let state = apply(AppState::default(), loaded(first));
        assert!(!state.loading);
        let state = apply(state, loaded(second.clone()));

        assert_eq!(state.coins, second);
    }

    #[test]
    fn test_poll_failure_keeps_collection() {
        let state = apply(AppState::default(), loaded(sample_coins("a", 100)));
        let before = state.coins.clone();

        let state = apply(state, failed("HTTP 500"));

        assert_eq!(state.coins, before);
        assert_eq!(state.last_error.as_deref(), Some("HTTP 500"));
        assert!(!state.loading);
    }

    #[test]
    fn test_first_poll_failure_clears_loading() {
        let state = apply(AppState::default(), failed("offline"));
        assert!(!state.loading);
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_results_from_previous_session_are_dropped() {
        let state = apply(AppState::default(), Action::PollingStarted);
        let session = state.poll_generation();
        let state = apply(
            state,
            Action::CoinsLoaded {
                generation: session,
                coins: sample_coins("a", 3),
                fetched_at: Utc::now(),
            },
        );
        let before = state.clone();

        let state = apply(state, Action::PollingStopped);
        assert_ne!(state.poll_generation(), session);
        let state = apply(
            state,
            Action::CoinsLoaded {
                generation: session,
                coins: sample_coins("b", 3),
                fetched_at: Utc::now(),
            },
        );
        let state = apply(
            state,
            Action::PollFailed {
                generation: session,
                error: "late".into(),
            },
        );

        assert_eq!(state.coins, before.coins);
        assert_eq!(state.last_updated, before.last_updated);
        assert_eq!(state.last_error, None);
    }

    #[test]
    fn test_toggle_requests_persist() {
        let (state, effects) = reduce(AppState::default(), Action::ToggleFavorite("bitcoin".into()));
        assert!(state.is_favorite("bitcoin"));
        assert_eq!(effects, vec![Effect::PersistFavorites(state.favorites.clone())]);

        let (state, effects) = reduce(state, Action::ToggleFavorite("bitcoin".into()));
        assert!(!state.is_favorite("bitcoin"));
        assert_eq!(effects, vec![Effect::PersistFavorites(Favorites::new())]);
    }

    #[test]
    fn test_search_does_not_touch_coins() {
        let state = apply(AppState::default(), loaded(sample_coins("a", 10)));
        let state = apply(state, Action::SearchChanged("COIN 3".into()));
        assert_eq!(state.coins.len(), 10);
        assert_eq!(state.visible_coins().len(), 1);

        let state = apply(state, Action::SearchChanged(String::new()));
        assert_eq!(state.visible_coins().len(), 10);
    }

    #[test]
    fn test_navigate_to_coin_starts_fetch() {
        let (state, effects) = reduce(
            AppState::default(),
            Action::Navigate(Route::Coin("bitcoin".into())),
        );
        assert_eq!(
            effects,
            vec![Effect::FetchDetail {
                id: "bitcoin".into(),
                token: FetchToken(0)
            }]
        );
        assert_eq!(
            state.detail,
            DetailState::Loading {
                id: "bitcoin".into(),
                token: FetchToken(0)
            }
        );
    }

    #[test]
    fn test_detail_failure_is_not_found() {
        let state = apply(
            AppState::default(),
            Action::Navigate(Route::Coin("nope".into())),
        );
        let state = apply(
            state,
            Action::DetailFailed {
                token: FetchToken(0),
                error: "Coin not found: nope".into(),
            },
        );
        assert_eq!(state.detail, DetailState::NotFound { id: "nope".into() });
    }

    #[test]
    fn test_stale_detail_result_is_discarded() {
        let coins = sample_coins("a", 2);
        let state = apply(
            AppState::default(),
            Action::Navigate(Route::Coin(coins[0].id.clone())),
        );
        let state = apply(state, Action::Navigate(Route::List));
        let state = apply(
            state,
            Action::DetailLoaded {
                token: FetchToken(0),
                detail: Box::new(CoinDetail::from(&coins[0])),
            },
        );
        assert_eq!(state.detail, DetailState::Idle);

        // Second navigation supersedes the first fetch
        let state = apply(state, Action::Navigate(Route::Coin(coins[0].id.clone())));
        let state = apply(state, Action::Navigate(Route::Coin(coins[1].id.clone())));
        let state = apply(
            state,
            Action::DetailLoaded {
                token: FetchToken(1),
                detail: Box::new(CoinDetail::from(&coins[0])),
            },
        );
        assert!(matches!(state.detail, DetailState::Loading { token: FetchToken(2), .. }));

        let state = apply(
            state,
            Action::DetailLoaded {
                token: FetchToken(2),
                detail: Box::new(CoinDetail::from(&coins[1])),
            },
        );
        assert_eq!(state.detail, DetailState::Loaded(CoinDetail::from(&coins[1])));
    }

    #[test]
    fn test_state_serializes() {
        let state = apply(AppState::default(), loaded(sample_coins("a", 3)));
        let state = apply(state, Action::ToggleFavorite("a-1".into()));
        let json = serde_json::to_string(&state).unwrap();
        let back: AppState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
