//! Addressable dashboard locations

use serde::{Deserialize, Serialize};

const COIN_PREFIX: &str = "/coin/";

/// The two views of the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Route {
    /// Root: the coin list
    #[default]
    List,
    /// Detail view for one coin id
    Coin(String),
}

impl Route {
    /// Parses a location path. Unknown paths resolve to the list.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        match path.strip_prefix(COIN_PREFIX) {
            Some(rest) => {
                let id = rest.trim_end_matches('/');
                if id.is_empty() || id.contains('/') {
                    Route::List
                } else {
                    Route::Coin(id.to_string())
                }
            }
            None => Route::List,
        }
    }

    /// Location path for this route
    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Coin(id) => format!("{}{}", COIN_PREFIX, id),
        }
    }

    pub fn coin_id(&self) -> Option<&str> {
        match self {
            Route::List => None,
            Route::Coin(id) => Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse(""), Route::List);
        assert_eq!(Route::parse("/coin/bitcoin"), Route::Coin("bitcoin".into()));
        assert_eq!(Route::parse("/coin/bitcoin/"), Route::Coin("bitcoin".into()));
        assert_eq!(Route::parse("/coin/usd-coin?ref=x"), Route::Coin("usd-coin".into()));
        assert_eq!(Route::parse("/coin/"), Route::List);
        assert_eq!(Route::parse("/coin/a/b"), Route::List);
        assert_eq!(Route::parse("/settings"), Route::List);
    }

    #[test]
    fn test_path() {
        assert_eq!(Route::List.path(), "/");
        let route = Route::Coin("ethereum".into());
        assert_eq!(route.path(), "/coin/ethereum");
        assert_eq!(Route::parse(&route.path()), route);
    }
}
