//! Filter state <-> `tags` query parameter

use super::{FilterMode, FilterState};
use url::Url;

/// Query parameter carrying the active tags
pub const TAGS_PARAM: &str = "tags";

/// Read the active tags from a location. Missing or empty parameter means
/// no filter; blank entries are dropped.
pub fn state_from_url(url: &Url, mode: FilterMode) -> FilterState {
    let mut state = FilterState::new();
    for (key, value) in url.query_pairs() {
        if key != TAGS_PARAM {
            continue;
        }
        for tag in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if mode == FilterMode::Single && !state.is_empty() {
                return state;
            }
            state.insert(tag);
        }
    }
    state
}

/// Location with the `tags` parameter rewritten for `state`.
///
/// Other parameters are kept in order. An empty state removes the parameter,
/// and the query entirely when nothing else is left.
pub fn state_to_url(url: &Url, state: &FilterState) -> Url {
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != TAGS_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut next = url.clone();
    if others.is_empty() && state.is_empty() {
        next.set_query(None);
        return next;
    }

    {
        let mut pairs = next.query_pairs_mut();
        pairs.clear();
        for (k, v) in &others {
            pairs.append_pair(k, v);
        }
        if !state.is_empty() {
            pairs.append_pair(TAGS_PARAM, &state.to_query_value());
        }
    }
    next
}
