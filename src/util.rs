use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

fn dash_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})-(\d{1,2})-(\d{4})").expect("valid regex"))
}

fn dotted_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})[._](\d{1,2})[._](\d{4})").expect("valid regex"))
}

fn short_year_date_re() -> &'static Regex {
    // No lookahead in `regex`, so the "not followed by a digit" guard is an
    // explicit alternation with end-of-input.
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{1,2})[._](\d{1,2})[._](\d{2})(?:\D|$)").expect("valid regex")
    })
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})").expect("valid regex"))
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// Extract the `M-D-YYYY` date key used to de-duplicate agenda files.
///
/// Example: "Board Agenda 1-14-2026.docx" → "1-14-2026"
pub fn date_key(path: &Path) -> Option<String> {
    dash_date_re()
        .captures(file_name(path))
        .map(|c| format!("{}-{}-{}", &c[1], &c[2], &c[3]))
}

/// Best-effort ISO date from a file name.
///
/// Tries `M-D-YYYY`, then `M.D.YYYY` / `M_D_YYYY`, then `M_D_YY` (20xx), then
/// falls back to a bare four-digit year.
pub fn date_from_filename(name: &str) -> Option<String> {
    let iso = |m: &str, d: &str, y: &str| format!("{}-{:0>2}-{:0>2}", y, m, d);

    if let Some(c) = dash_date_re().captures(name) {
        return Some(iso(&c[1], &c[2], &c[3]));
    }
    if let Some(c) = dotted_date_re().captures(name) {
        return Some(iso(&c[1], &c[2], &c[3]));
    }
    if let Some(c) = short_year_date_re().captures(name) {
        let year = format!("20{}", &c[3]);
        return Some(iso(&c[1], &c[2], &year));
    }
    year_re().captures(name).map(|c| c[1].to_string())
}

/// Keep the first item for every derived key, preserving input order.
pub fn first_wins_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Keep every specific source, plus each generic source whose key no
/// specific source covers. Generic sources without a key are always kept.
///
/// Used for volunteer files, where a team-named file replaces the loosely
/// named file for that team.
pub fn prefer_specific<T, K, S, F>(items: Vec<T>, is_specific: S, key: F) -> Vec<T>
where
    K: Eq + Hash,
    S: Fn(&T) -> bool,
    F: Fn(&T) -> Option<K>,
{
    let covered: HashSet<K> = items
        .iter()
        .filter(|i| is_specific(*i))
        .filter_map(|i| key(i))
        .collect();
    items
        .into_iter()
        .filter(|i| is_specific(i) || key(i).map_or(true, |k| !covered.contains(&k)))
        .collect()
}
