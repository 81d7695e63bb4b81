//! Volunteer needs per team.
//!
//! Each team publishes a "Team Needs" workbook: a title row naming the team,
//! then role descriptions each followed by numbered slots (`1)`, `2)`, ...)
//! with a volunteer's name beside the slot once filled.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::IngestError;
use crate::processor::tabular::{Grid, Workbook};
use crate::types::{VolunteerNeed, VolunteerSummary, VolunteerTeam};
use crate::util::prefer_specific;

const FIRST_ROLE_ROW: usize = 2;
const MIN_ROLE_LEN: usize = 5;
const MIN_NAME_LEN: usize = 2;

/// File names that identify exactly one team.
const SPECIFIC_TEAM_NAMES: [&str; 3] = ["jv blue", "jv gold", "varsity gold"];

fn slot_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\)\s*").expect("valid regex"))
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Team from the file name or the title cell, specific names before
/// generic ones. A bare "JV" means JV Blue; anything else is Varsity Gold.
pub fn detect_team(file_name: &str, title: &str) -> VolunteerTeam {
    let file_name = file_name.to_lowercase();
    let title = title.to_lowercase();
    let mentions = |needle: &str| file_name.contains(needle) || title.contains(needle);

    if mentions("jv blue") {
        VolunteerTeam::JvBlue
    } else if mentions("jv gold") {
        VolunteerTeam::JvGold
    } else if mentions("c team") {
        VolunteerTeam::CTeam
    } else if mentions("varsity") {
        VolunteerTeam::VarsityGold
    } else if mentions("jv") {
        VolunteerTeam::JvBlue
    } else {
        VolunteerTeam::VarsityGold
    }
}

/// Role name: text before any colon or parenthetical. `None` when nothing
/// is left, as for a header that is only a parenthetical note.
fn role_name(cell: &str) -> Option<String> {
    let before_colon = cell.split(':').next().unwrap_or(cell);
    let role = before_colon.split('(').next().unwrap_or(before_colon).trim();
    (!role.is_empty()).then(|| role.to_string())
}

pub fn parse_volunteer_grid(file_name: &str, grid: &Grid) -> Vec<VolunteerNeed> {
    let team = detect_team(file_name, &grid.text(0, 0));
    let mut needs = Vec::new();
    let mut current_role: Option<String> = None;

    for i in FIRST_ROLE_ROW..grid.len() {
        let cell0 = grid.text(i, 0);
        if cell0.is_empty() {
            continue;
        }

        let is_slot = slot_re().is_match(&cell0);
        if !is_slot {
            if cell0.chars().count() > MIN_ROLE_LEN {
                // Slots under an unnamed header are dropped
                current_role = role_name(&cell0);
            }
            continue;
        }

        let Some(role) = current_role.as_ref() else {
            continue;
        };
        let beside = grid.text(i, 1);
        let name = if beside.is_empty() {
            slot_re().replace(&cell0, "").trim().to_string()
        } else {
            beside
        };
        let filled = name.chars().count() > MIN_NAME_LEN && !slot_re().is_match(&name);

        needs.push(VolunteerNeed {
            role: role.clone(),
            description: role.clone(),
            team,
            filled,
            volunteer_name: filled.then_some(name),
        });
    }

    needs
}

pub fn parse_volunteer_file(path: &Path) -> Result<Vec<VolunteerNeed>, IngestError> {
    let workbook = Workbook::open(path)?;
    Ok(parse_volunteer_grid(&file_name_lower(path), &workbook.first_sheet()))
}

fn is_specific_file(path: &Path) -> bool {
    let name = file_name_lower(path);
    SPECIFIC_TEAM_NAMES.iter().any(|t| name.contains(t))
}

/// Merge per-file needs. Every specific team file is kept; a loosely named
/// file is dropped whole only when a specific file covers its team.
pub fn merge_volunteer_needs(files: Vec<(PathBuf, Vec<VolunteerNeed>)>) -> VolunteerSummary {
    let kept = prefer_specific(
        files,
        |(path, _)| is_specific_file(path),
        |(_, needs)| needs.first().map(|n| n.team),
    );
    let all: Vec<VolunteerNeed> = kept.into_iter().flat_map(|(_, needs)| needs).collect();

    let for_team = |team: VolunteerTeam| -> Vec<VolunteerNeed> {
        all.iter().filter(|n| n.team == team).cloned().collect()
    };
    VolunteerSummary {
        varsity_gold: for_team(VolunteerTeam::VarsityGold),
        jv_blue: for_team(VolunteerTeam::JvBlue),
        jv_gold: for_team(VolunteerTeam::JvGold),
        c_team: for_team(VolunteerTeam::CTeam),
        total_needs: all.len(),
        total_filled: all.iter().filter(|n| n.filled).count(),
    }
}

pub fn parse_volunteer_files(paths: &[PathBuf]) -> Result<VolunteerSummary, IngestError> {
    let parsed = paths
        .iter()
        .filter_map(|path| match parse_volunteer_file(path) {
            Ok(needs) => Some((path.clone(), needs)),
            Err(e) => {
                log::warn!("Volunteer needs: skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect();
    Ok(merge_volunteer_needs(parsed))
}
