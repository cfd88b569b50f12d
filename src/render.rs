//! Text rendering of the list and detail views
//!
//! Rendering is a pure function of [`AppState`]; it never triggers fetches.

use crate::{
    route::Route,
    state::{AppState, DetailState},
    types::{Coin, CoinDetail},
};
use chrono::{DateTime, Utc};

const MISSING: &str = "-";
const INFINITY: &str = "∞";
const FAVORITE_ON: &str = "★";
const FAVORITE_OFF: &str = "☆";

/// Up/down indicator for a percentage change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
}

impl ChangeDirection {
    /// `Up` only for strictly positive changes; zero counts as `Down`
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 0.0 {
            ChangeDirection::Up
        } else {
            ChangeDirection::Down
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            ChangeDirection::Up => "▲",
            ChangeDirection::Down => "▼",
        }
    }
}

/// Formats a value in millions, e.g. `19.70M`
pub fn format_millions(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}M", v / 1_000_000.0),
        None => MISSING.to_string(),
    }
}

/// Formats circulating over max supply; an absent max renders as `∞`
pub fn format_supply(circulating: Option<f64>, max: Option<f64>) -> String {
    let max = match max {
        Some(_) => format_millions(max),
        None => INFINITY.to_string(),
    };
    format!("{} / {}", format_millions(circulating), max)
}

/// Formats a price, with more decimals for sub-dollar coins
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p.abs() < 1.0 => format!("${:.6}", p),
        Some(p) => format!("${:.2}", p),
        None => MISSING.to_string(),
    }
}

/// Formats a change as `▲ 1.23%` / `▼ -0.50%`
pub fn format_change(percentage: Option<f64>) -> String {
    match percentage {
        Some(p) => format!("{} {:.2}%", ChangeDirection::from_percentage(p).arrow(), p),
        None => MISSING.to_string(),
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn format_rank(rank: Option<u32>) -> String {
    rank.map(|r| format!("#{}", r))
        .unwrap_or_else(|| format!("#{}", MISSING))
}

/// Joins view lines, terminating each with a newline
fn join_lines(lines: Vec<String>) -> String {
    lines.into_iter().map(|l| l + "\n").collect()
}

fn back_link() -> String {
    format!("<- Back ({})", Route::List.path())
}

/// Renders one list card
pub fn render_card(coin: &Coin, favorite: bool) -> String {
    let star = if favorite { FAVORITE_ON } else { FAVORITE_OFF };
    join_lines(vec![
        format!(
            "{} {} {} ({}) [{}]",
            star,
            format_rank(coin.market_cap_rank),
            coin.symbol.to_uppercase(),
            coin.name,
            coin.id
        ),
        format!("  Price:      {}", format_price(coin.current_price)),
        format!(
            "  1h:         {}    24h: {}",
            format_change(coin.price_change_percentage_1h),
            format_change(coin.price_change_percentage_24h)
        ),
        format!("  Market cap: {}", format_millions(coin.market_cap)),
        format!("  Volume:     {}", format_millions(coin.total_volume)),
        format!(
            "  Supply:     {}",
            format_supply(coin.circulating_supply, coin.max_supply)
        ),
        format!("  -> {}", Route::Coin(coin.id.clone()).path()),
    ])
}

/// Renders the list view
pub fn render_list(state: &AppState) -> String {
    let visible = state.visible_coins();

    let mut header = format!("Coins ({} of {})", visible.len(), state.coins.len());
    if !state.search_term.is_empty() {
        header.push_str(&format!("  search: \"{}\"", state.search_term));
    }
    if state.favorites_only {
        header.push_str("  favorites only");
    }

    let mut lines = vec![header];
    if let Some(error) = &state.last_error {
        lines.push(format!("! Last refresh failed: {}", error));
    }

    if state.coins.is_empty() {
        lines.push(if state.loading {
            "Loading...".to_string()
        } else {
            "No market data yet.".to_string()
        });
        return join_lines(lines);
    }
    if visible.is_empty() {
        lines.push("No coins match.".to_string());
        return join_lines(lines);
    }

    let mut out = join_lines(lines);
    for coin in visible {
        out.push('\n');
        out.push_str(&render_card(coin, state.is_favorite(&coin.id)));
    }
    out
}

/// Renders a loaded detail record
pub fn render_coin_detail(detail: &CoinDetail, favorite: bool) -> String {
    let star = if favorite { FAVORITE_ON } else { FAVORITE_OFF };
    let max_supply = match detail.max_supply {
        Some(_) => format_millions(detail.max_supply),
        None => INFINITY.to_string(),
    };

    join_lines(vec![
        back_link(),
        format!(
            "{} {} {} ({})",
            star,
            format_rank(detail.market_cap_rank),
            detail.name,
            detail.symbol.to_uppercase()
        ),
        format!("Price:            {}", format_price(detail.current_price)),
        format!("1h:               {}", format_change(detail.price_change_percentage_1h)),
        format!("24h:              {}", format_change(detail.price_change_percentage_24h)),
        format!("7d:               {}", format_change(detail.price_change_percentage_7d)),
        format!("30d:              {}", format_change(detail.price_change_percentage_30d)),
        format!("Market cap:       {}", format_millions(detail.market_cap)),
        format!(
            "Market cap 24h:   {} ({})",
            format_millions(detail.market_cap_change_24h),
            format_change(detail.market_cap_change_percentage_24h)
        ),
        format!("Volume:           {}", format_millions(detail.total_volume)),
        format!(
            "24h range:        {} - {}",
            format_price(detail.low_24h),
            format_price(detail.high_24h)
        ),
        format!("Circulating:      {}", format_millions(detail.circulating_supply)),
        format!("Total supply:     {}", format_millions(detail.total_supply)),
        format!("Max supply:       {}", max_supply),
        format!(
            "All-time high:    {} on {}",
            format_price(detail.ath),
            format_date(detail.ath_date)
        ),
        format!(
            "All-time low:     {} on {}",
            format_price(detail.atl),
            format_date(detail.atl_date)
        ),
    ])
}

/// Renders the detail view in whatever state it is in
pub fn render_detail(state: &AppState) -> String {
    match &state.detail {
        DetailState::Loaded(detail) => render_coin_detail(detail, state.is_favorite(&detail.id)),
        DetailState::Loading { id, .. } => {
            join_lines(vec![back_link(), format!("Loading {}...", id)])
        }
        DetailState::NotFound { id } => {
            join_lines(vec![back_link(), format!("Coin not found: {}", id)])
        }
        DetailState::Idle => join_lines(vec![back_link(), "Nothing selected.".to_string()]),
    }
}

/// Renders the view selected by the current route
pub fn render(state: &AppState) -> String {
    match state.route {
        Route::List => render_list(state),
        Route::Coin(_) => render_detail(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::sample_coins;
    use crate::state::{reduce, Action, FetchToken, PollGeneration};

    fn btc() -> Coin {
        let mut coin = Coin::new("bitcoin", "btc", "Bitcoin");
        coin.market_cap_rank = Some(1);
        coin.current_price = Some(67012.5);
        coin.price_change_percentage_1h = Some(0.52);
        coin.price_change_percentage_24h = Some(-1.2);
        coin.market_cap = Some(1_320_000_000_000.0);
        coin.total_volume = Some(25_000_000_000.0);
        coin.circulating_supply = Some(19_700_000.0);
        coin.max_supply = Some(21_000_000.0);
        coin
    }

    #[test]
    fn test_zero_change_is_down() {
        assert_eq!(ChangeDirection::from_percentage(0.0), ChangeDirection::Down);
        assert_eq!(ChangeDirection::from_percentage(-0.0), ChangeDirection::Down);
        assert_eq!(ChangeDirection::from_percentage(0.01), ChangeDirection::Up);
        assert_eq!(ChangeDirection::from_percentage(-3.0), ChangeDirection::Down);
        assert_eq!(format_change(Some(0.0)), "▼ 0.00%");
    }

    #[test]
    fn test_unbounded_supply_ends_with_infinity() {
        let supply = format_supply(Some(120_200_000.0), None);
        assert_eq!(supply, "120.20M / ∞");
        assert!(supply.ends_with('∞'));
        assert_eq!(format_supply(Some(19_700_000.0), Some(21_000_000.0)), "19.70M / 21.00M");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(67012.5)), "$67012.50");
        assert_eq!(format_price(Some(0.0000123)), "$0.000012");
        assert_eq!(format_price(None), "-");
    }

    #[test]
    fn test_card_contents() {
        let card = render_card(&btc(), true);
        assert!(card.starts_with("★ #1 BTC (Bitcoin) [bitcoin]"));
        assert!(card.contains("Price:      $67012.50"));
        assert!(card.contains("▲ 0.52%"));
        assert!(card.contains("24h: ▼ -1.20%"));
        assert!(card.contains("Market cap: 1320000.00M"));
        assert!(card.contains("Volume:     25000.00M"));
        assert!(card.contains("Supply:     19.70M / 21.00M"));
        assert!(card.contains("-> /coin/bitcoin"));

        let mut eth = Coin::new("ethereum", "eth", "Ethereum");
        eth.price_change_percentage_24h = Some(0.0);
        let card = render_card(&eth, false);
        assert!(card.starts_with("☆"));
        assert!(card.contains("24h: ▼ 0.00%"));
        assert!(card.lines().any(|l| l.contains("Supply:") && l.ends_with('∞')));
    }

    #[test]
    fn test_list_placeholders() {
        let state = AppState::default();
        assert!(render(&state).contains("Loading..."));

        let (state, _) = reduce(
            state,
            Action::CoinsLoaded {
                generation: PollGeneration::default(),
                coins: sample_coins("a", 3),
                fetched_at: Utc::now(),
            },
        );
        let (state, _) = reduce(state, Action::SearchChanged("zzz".into()));
        let out = render(&state);
        assert!(out.starts_with("Coins (0 of 3)  search: \"zzz\""));
        assert!(out.contains("No coins match."));
    }

    #[test]
    fn test_failed_first_poll_shows_no_data() {
        let (state, _) = reduce(
            AppState::default(),
            Action::PollFailed {
                generation: PollGeneration::default(),
                error: "HTTP 503".into(),
            },
        );
        let out = render(&state);
        assert_eq!(
            out,
            "Coins (0 of 0)\n! Last refresh failed: HTTP 503\nNo market data yet.\n"
        );
        assert!(!out.contains("No coins match."));
        assert!(!out.contains("Loading..."));
    }

    #[test]
    fn test_placeholders_link_back_to_list() {
        let back = format!("<- Back ({})", Route::List.path());
        let mut idle = AppState::default();
        idle.route = Route::Coin("bitcoin".into());
        assert!(render(&idle).starts_with(&back));

        let (state, _) = reduce(
            AppState::default(),
            Action::Navigate(Route::Coin("ghost".into())),
        );
        assert!(render(&state).starts_with(&back));
        let (state, _) = reduce(
            state,
            Action::DetailFailed {
                token: FetchToken(0),
                error: "gone".into(),
            },
        );
        assert!(render(&state).starts_with(&back));
    }

    #[test]
    fn test_list_renders_every_visible_coin() {
        let (state, _) = reduce(
            AppState::default(),
            Action::CoinsLoaded {
                generation: PollGeneration::default(),
                coins: sample_coins("a", 5),
                fetched_at: Utc::now(),
            },
        );
        let (state, _) = reduce(state, Action::ToggleFavorite("a-2".into()));
        let out = render(&state);
        assert!(out.starts_with("Coins (5 of 5)"));
        assert_eq!(out.matches("-> /coin/").count(), 5);
        assert!(out.contains("★ #3 A2"));
    }

    #[test]
    fn test_detail_states() {
        let (state, _) = reduce(
            AppState::default(),
            Action::Navigate(Route::Coin("ghost".into())),
        );
        assert!(render(&state).contains("Loading ghost..."));

        let (state, _) = reduce(
            state,
            Action::DetailFailed {
                token: FetchToken(0),
                error: "Coin not found: ghost".into(),
            },
        );
        assert!(render(&state).contains("Coin not found: ghost"));

        let (state, _) = reduce(state, Action::Navigate(Route::Coin("bitcoin".into())));
        let mut detail = CoinDetail::from(&btc());
        detail.ath = Some(73738.0);
        detail.ath_date = "2024-03-14T07:10:36.635Z".parse().ok();
        detail.price_change_percentage_30d = Some(12.0);
        let (state, _) = reduce(
            state,
            Action::DetailLoaded {
                token: FetchToken(1),
                detail: Box::new(detail),
            },
        );
        let out = render(&state);
        assert!(out.starts_with("<- Back (/)"));
        assert!(out.contains("30d:              ▲ 12.00%"));
        assert!(out.contains("All-time high:    $73738.00 on 2024-03-14"));
        assert!(out.contains("All-time low:     - on -"));
        assert!(out.contains("Max supply:       21.00M"));
    }
}
