//! Team rosters from the rosters document's plain text.
//!
//! Lines are `Name<TAB>Number<TAB>Grade` grouped under team header lines.
//! Scanning is a fold over lines with the current [`Team`] as state: a
//! header line switches team (and may carry a player after the header
//! word), C-Team and Freshman headers are ignored, anything else is a
//! player on the current team.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::IngestError;
use crate::processor::extract;
use crate::types::{Player, RosterData, Team};

/// What a single roster line means to the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterLine {
    /// Switches to `team`; `rest` is any text after the header word.
    Header { team: Team, rest: String },
    /// Header or noise with no roster meaning.
    Ignored,
    /// A player line for the current team.
    Entry(String),
}

fn header_re(keyword: &str) -> Regex {
    Regex::new(&format!(r"(?i).*{}\s*", regex::escape(keyword))).expect("valid regex")
}

fn header_patterns() -> &'static [(Team, &'static str, Regex); 4] {
    static PATTERNS: OnceLock<[(Team, &'static str, Regex); 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (Team::Varsity, "varsity", header_re("varsity")),
            (Team::JvBlue, "jv blue", header_re("jv blue")),
            (Team::JvGold, "jv gold", header_re("jv gold")),
            // Generic JV header defaults to JV Blue
            (Team::JvBlue, "jv", header_re("jv")),
        ]
    })
}

fn after_header(line: &str, re: &Regex) -> String {
    re.replace(line, "").trim().to_string()
}

/// Classify a trimmed, non-empty line.
pub fn classify_line(line: &str) -> RosterLine {
    let lower = line.to_lowercase();
    let [varsity, jv_blue, jv_gold, jv] = header_patterns();

    if lower.contains("varsity") && !lower.contains("jv") {
        return RosterLine::Header { team: varsity.0, rest: after_header(line, &varsity.2) };
    }
    for (team, keyword, re) in [jv_blue, jv_gold] {
        if lower.contains(keyword) {
            return RosterLine::Header { team: *team, rest: after_header(line, re) };
        }
    }
    if lower.contains(jv.1) {
        return RosterLine::Header { team: jv.0, rest: after_header(line, &jv.2) };
    }

    // No C-Team in the program
    if lower.contains("c-team") || lower.contains("c team") || lower.contains("freshman") {
        return RosterLine::Ignored;
    }
    if lower == "name" || lower.contains("name\t") || lower.starts_with("name ") {
        return RosterLine::Ignored;
    }
    RosterLine::Entry(line.to_string())
}

/// Parse a tab-delimited `name, number?, grade?` line.
pub fn parse_player_line(line: &str, team: Team) -> Option<Player> {
    let mut parts = line.split('\t').map(str::trim).filter(|p| !p.is_empty());

    let name = parts.next()?;
    if name.chars().count() < 2 {
        return None;
    }
    let lower = name.to_lowercase();
    if lower == "name" || lower == "number" {
        return None;
    }

    Some(Player {
        name: name.to_string(),
        number: parts.next().map(str::to_string),
        grade: parts.next().map(str::to_string),
        team,
    })
}

fn push_player(roster: &mut RosterData, player: Player) {
    match player.team {
        Team::Varsity => roster.varsity.push(player),
        Team::JvBlue => roster.jv_blue.push(player),
        Team::JvGold => roster.jv_gold.push(player),
    }
}

pub fn parse_roster_text(text: &str) -> RosterData {
    let mut roster = RosterData::default();

    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .fold(Team::Varsity, |team, line| match classify_line(line) {
            RosterLine::Header { team: next, rest } => {
                if let Some(player) = parse_player_line(&rest, next) {
                    push_player(&mut roster, player);
                }
                next
            }
            RosterLine::Ignored => team,
            RosterLine::Entry(entry) => {
                if let Some(player) = parse_player_line(&entry, team) {
                    push_player(&mut roster, player);
                }
                team
            }
        });

    roster
}

pub fn parse_roster_file(path: &Path) -> Result<RosterData, IngestError> {
    let text = extract::to_plain_text(path)?;
    Ok(parse_roster_text(&text))
}
