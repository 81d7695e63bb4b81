//! Global search over dashboard pages, alumni, sponsors and compliance
//! items.

use crate::program::{COMPLIANCE_ITEMS, PAGES, SPONSORS};
use crate::types::{Alumnus, SearchCategory, SearchItem};

const SPONSORSHIPS_HREF: &str = "/sponsorships";
const COMPLIANCE_HREF: &str = "/compliance";

/// Flatten static metadata and the configured alumni into one list, in the
/// order pages, alumni, sponsors, compliance.
pub fn build_search_index(alumni: &[Alumnus]) -> Vec<SearchItem> {
    let pages = PAGES.iter().map(|p| SearchItem {
        title: p.title.to_string(),
        category: SearchCategory::Page,
        href: p.href.to_string(),
        subtitle: Some(p.subtitle.to_string()),
    });

    let alumni = alumni.iter().map(|a| SearchItem {
        title: a.name.clone(),
        category: SearchCategory::Alumni,
        href: SPONSORSHIPS_HREF.to_string(),
        subtitle: Some(if a.teams.is_empty() {
            format!("Class of {}", a.grad_year)
        } else {
            format!("Class of {} - {}", a.grad_year, a.teams)
        }),
    });

    let sponsors = SPONSORS.iter().map(|s| SearchItem {
        title: s.name.to_string(),
        category: SearchCategory::Sponsor,
        href: SPONSORSHIPS_HREF.to_string(),
        subtitle: Some("Sponsor".to_string()),
    });

    let compliance = COMPLIANCE_ITEMS.iter().map(|c| SearchItem {
        title: c.title.to_string(),
        category: SearchCategory::Compliance,
        href: COMPLIANCE_HREF.to_string(),
        subtitle: Some(c.subtitle.to_string()),
    });

    pages.chain(alumni).chain(sponsors).chain(compliance).collect()
}

fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(|t| t.to_lowercase()).collect()
}

fn matches(item: &SearchItem, terms: &[String]) -> bool {
    let title = item.title.to_lowercase();
    let subtitle = item.subtitle.as_deref().unwrap_or("").to_lowercase();
    terms
        .iter()
        .all(|t| title.contains(t.as_str()) || subtitle.contains(t.as_str()))
}

/// Items where every query term appears in the title or subtitle, case
/// insensitive. A blank query matches nothing.
pub fn search<'a>(items: &'a [SearchItem], query: &str) -> Vec<&'a SearchItem> {
    let terms = tokenize(query);
    if terms.is_empty() {
        return Vec::new();
    }
    items.iter().filter(|item| matches(item, &terms)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alumni() -> Vec<Alumnus> {
        vec![Alumnus {
            name: "Riley Carter".to_string(),
            grad_year: 2019,
            teams: "Gonzaga".to_string(),
        }]
    }

    #[test]
    fn test_index_order_and_counts() {
        let index = build_search_index(&alumni());
        assert_eq!(index.len(), PAGES.len() + 1 + SPONSORS.len() + COMPLIANCE_ITEMS.len());
        assert_eq!(index[0].title, "Executive Summary");
        let alum = &index[PAGES.len()];
        assert_eq!(alum.category, SearchCategory::Alumni);
        assert_eq!(alum.subtitle.as_deref(), Some("Class of 2019 - Gonzaga"));
        assert_eq!(index.last().map(|i| i.href.as_str()), Some("/compliance"));
    }

    #[test]
    fn test_all_terms_must_match() {
        let index = build_search_index(&alumni());
        let hits = search(&index, "BUDGET line");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Budget Detail");

        // Terms may be split across title and subtitle
        let hits = search(&index, "riley 2019");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].href, "/sponsorships");

        assert!(search(&index, "budget zebra").is_empty());
    }

    #[test]
    fn test_blank_query() {
        let index = build_search_index(&[]);
        assert!(search(&index, "   ").is_empty());
    }

    #[test]
    fn test_sponsor_lookup() {
        let index = build_search_index(&[]);
        let hits = search(&index, "pizza");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, SearchCategory::Sponsor);
    }
}
