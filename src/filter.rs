//! Search, favorites-only and sort projections over the coin list
//!
//! Everything here is a pure function of its inputs. The visible list is
//! recomputed from the full collection on every call; nothing is cached.

use crate::{favorites::Favorites, types::Coin};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Returns the coins whose name or symbol contains `term`, ignoring case
///
/// An empty term returns every coin. Provider order is preserved.
pub fn filter_coins<'a>(coins: &'a [Coin], term: &str) -> Vec<&'a Coin> {
    if term.is_empty() {
        return coins.iter().collect();
    }
    let needle = term.to_lowercase();
    coins
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.symbol.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Column a list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Rank,
    Name,
    Price,
    Change24h,
    MarketCap,
    Volume,
}

/// A sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub key: SortKey,
    pub descending: bool,
}

impl SortOrder {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            descending: false,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            descending: true,
        }
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Orders present values by `cmp`, placing missing values last in both directions
fn compare_present<T>(
    a: Option<T>,
    b: Option<T>,
    descending: bool,
    cmp: impl Fn(T, T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = cmp(a, b);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable-sorts `coins` in place
pub fn sort_coins(coins: &mut [&Coin], order: SortOrder) {
    let desc = order.descending;
    coins.sort_by(|a, b| match order.key {
        SortKey::Rank => compare_present(a.market_cap_rank, b.market_cap_rank, desc, |x, y| x.cmp(&y)),
        SortKey::Name => {
            let ord = a.name.to_lowercase().cmp(&b.name.to_lowercase());
            if desc {
                ord.reverse()
            } else {
                ord
            }
        }
        SortKey::Price => compare_present(a.current_price, b.current_price, desc, compare_f64),
        SortKey::Change24h => compare_present(
            a.price_change_percentage_24h,
            b.price_change_percentage_24h,
            desc,
            compare_f64,
        ),
        SortKey::MarketCap => compare_present(a.market_cap, b.market_cap, desc, compare_f64),
        SortKey::Volume => compare_present(a.total_volume, b.total_volume, desc, compare_f64),
    });
}

/// Inputs of the visible list besides the coin collection
#[derive(Debug, Clone, Copy)]
pub struct ListQuery<'a> {
    pub search_term: &'a str,
    pub favorites: &'a Favorites,
    pub favorites_only: bool,
    pub sort: Option<SortOrder>,
}

/// Search, then restrict to favorites if asked, then sort if asked
pub fn project<'a>(coins: &'a [Coin], query: ListQuery<'_>) -> Vec<&'a Coin> {
    let mut visible = filter_coins(coins, query.search_term);
    if query.favorites_only {
        visible.retain(|c| query.favorites.contains(&c.id));
    }
    if let Some(order) = query.sort {
        sort_coins(&mut visible, order);
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, symbol: &str, name: &str) -> Coin {
        Coin::new(id, symbol, name)
    }

    fn coins() -> Vec<Coin> {
        let mut list = vec![
            coin("bitcoin", "btc", "Bitcoin"),
            coin("ethereum", "eth", "Ethereum"),
            coin("tether", "usdt", "Tether"),
            coin("wrapped-bitcoin", "wbtc", "Wrapped Bitcoin"),
            coin("solana", "sol", "Solana"),
        ];
        for (i, c) in list.iter_mut().enumerate() {
            c.market_cap_rank = Some(i as u32 + 1);
        }
        list[0].current_price = Some(67000.0);
        list[1].current_price = Some(3500.0);
        list[2].current_price = Some(1.0);
        list[4].current_price = Some(150.0);
        list
    }

    fn ids(list: &[&Coin]) -> Vec<String> {
        list.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_empty_term_returns_all_in_order() {
        let all = coins();
        let visible = filter_coins(&all, "");
        assert_eq!(
            ids(&visible),
            all.iter().map(|c| c.id.clone()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_matches_name_or_symbol_case_insensitively() {
        let all = coins();
        assert_eq!(ids(&filter_coins(&all, "BITCOIN")), vec!["bitcoin", "wrapped-bitcoin"]);
        assert_eq!(ids(&filter_coins(&all, "Btc")), vec!["bitcoin", "wrapped-bitcoin"]);
        assert_eq!(ids(&filter_coins(&all, "usdt")), vec!["tether"]);
        assert_eq!(ids(&filter_coins(&all, "eth")), vec!["ethereum", "tether"]);
        assert!(filter_coins(&all, "doge").is_empty());
    }

    #[test]
    fn test_filter_equals_predicate_for_every_substring() {
        let all = coins();
        let terms = ["", "b", "in", "ET", "sol", "w", "x", " "];
        for term in terms {
            let expected: Vec<String> = all
                .iter()
                .filter(|c| {
                    let t = term.to_lowercase();
                    c.name.to_lowercase().contains(&t) || c.symbol.to_lowercase().contains(&t)
                })
                .map(|c| c.id.clone())
                .collect();
            assert_eq!(ids(&filter_coins(&all, term)), expected, "term {term:?}");
        }
    }

    #[test]
    fn test_sort_missing_values_last() {
        let all = coins();
        let mut visible = filter_coins(&all, "");

        sort_coins(&mut visible, SortOrder::ascending(SortKey::Price));
        assert_eq!(
            ids(&visible),
            vec!["tether", "solana", "ethereum", "bitcoin", "wrapped-bitcoin"]
        );

        sort_coins(&mut visible, SortOrder::descending(SortKey::Price));
        assert_eq!(
            ids(&visible),
            vec!["bitcoin", "ethereum", "solana", "tether", "wrapped-bitcoin"]
        );
    }

    #[test]
    fn test_sort_by_name_and_rank() {
        let all = coins();
        let mut visible = filter_coins(&all, "");
        sort_coins(&mut visible, SortOrder::ascending(SortKey::Name));
        assert_eq!(ids(&visible)[0], "bitcoin");
        assert_eq!(ids(&visible)[4], "wrapped-bitcoin");

        sort_coins(&mut visible, SortOrder::ascending(SortKey::Rank));
        assert_eq!(ids(&visible), ids(&filter_coins(&all, "")));
    }

    #[test]
    fn test_project_combines_search_favorites_and_sort() {
        let all = coins();
        let mut favorites = Favorites::new();
        favorites.toggle("wrapped-bitcoin");
        favorites.toggle("bitcoin");

        let visible = project(
            &all,
            ListQuery {
                search_term: "bit",
                favorites: &favorites,
                favorites_only: true,
                sort: Some(SortOrder::descending(SortKey::Rank)),
            },
        );
        assert_eq!(ids(&visible), vec!["wrapped-bitcoin", "bitcoin"]);

        let visible = project(
            &all,
            ListQuery {
                search_term: "",
                favorites: &favorites,
                favorites_only: false,
                sort: None,
            },
        );
        assert_eq!(visible.len(), all.len());
    }
}
