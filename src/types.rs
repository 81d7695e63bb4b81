use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Configuration
// =============================================================================

/// Default cache time-to-live in seconds (5 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Root of the synced folder tree. Defaults to `../downloaded_files`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Collegiate alumni surfaced in the search index.
    #[serde(default)]
    pub alumni: Vec<Alumnus>,
    /// When non-empty, only agendas for these `YYYY-MM-DD` dates are shown.
    #[serde(default)]
    pub featured_meeting_dates: Vec<String>,
}

fn default_data_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("..")
        .join("downloaded_files")
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            alumni: Vec::new(),
            featured_meeting_dates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alumnus {
    pub name: String,
    pub grad_year: u16,
    #[serde(default)]
    pub teams: String,
}

// =============================================================================
// Financial records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLineItem {
    pub category: String,
    pub subcategory: String,
    pub budgeted: f64,
    pub actual: f64,
    pub remaining: f64,
    pub percent_used: f64,
}

impl BudgetLineItem {
    pub fn new(category: &str, subcategory: &str, budgeted: f64, actual: f64, remaining: f64) -> Self {
        Self {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            budgeted,
            actual,
            remaining,
            percent_used: percent_used(budgeted, actual),
        }
    }
}

/// Share of the budget consumed. With no budget, any spending counts as 100%.
pub fn percent_used(budgeted: f64, actual: f64) -> f64 {
    if budgeted > 0.0 {
        actual / budgeted * 100.0
    } else if actual > 0.0 {
        100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub name: String,
    pub items: Vec<BudgetLineItem>,
    pub total_budgeted: f64,
    pub total_actual: f64,
    pub total_remaining: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetTotals {
    pub budgeted: f64,
    pub actual: f64,
}

/// Whether block boundaries in a budget grid were found by their anchors or
/// fell back to fixed row guesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseConfidence {
    #[default]
    Detected,
    BestGuess,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetData {
    pub fiscal_year: String,
    pub start_date: String,
    pub end_date: String,
    pub income: Vec<BudgetCategory>,
    pub expenses: Vec<BudgetCategory>,
    pub total_income: BudgetTotals,
    pub total_expenses: BudgetTotals,
    pub net_income: BudgetTotals,
    #[serde(skip)]
    pub confidence: ParseConfidence,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBudgetData {
    pub month: String,
    pub budgeted_income: f64,
    pub actual_income: f64,
    pub budgeted_expenses: f64,
    pub actual_expenses: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundBalance {
    pub checking: f64,
    pub savings: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalBudget {
    pub fiscal_year: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSource {
    pub name: String,
    pub budgeted: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalRevenueBySource {
    pub fiscal_year: String,
    pub sources: Vec<RevenueSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: f64,
    pub fees: f64,
    pub net: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTransactions {
    pub month: String,
    pub revenue: f64,
    pub fees: f64,
    pub net: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTransactions {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_revenue: f64,
    pub total_fees: f64,
    pub total_net: f64,
    pub transaction_count: usize,
    pub by_month: Vec<MonthlyTransactions>,
    pub by_category: Vec<CategoryTransactions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachsFundEntry {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachsFundData {
    pub starting_balance: f64,
    pub entries: Vec<CoachsFundEntry>,
    pub current_balance: f64,
}

// =============================================================================
// Operational records
// =============================================================================

/// The three rostered teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Varsity,
    #[serde(rename = "JV Blue")]
    JvBlue,
    #[serde(rename = "JV Gold")]
    JvGold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub team: Team,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterData {
    pub varsity: Vec<Player>,
    pub jv_blue: Vec<Player>,
    pub jv_gold: Vec<Player>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UniformStatus {
    Available,
    CheckedOut,
    Returned,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformItem {
    pub jersey_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub item: String,
    pub size: String,
    pub status: UniformStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformInventory {
    pub items: Vec<UniformItem>,
    pub total_items: usize,
    pub checked_out: usize,
    pub returned: usize,
    pub missing: usize,
    pub available: usize,
}

/// Teams that publish volunteer needs. Varsity files are labelled "Varsity Gold".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolunteerTeam {
    #[serde(rename = "Varsity Gold")]
    VarsityGold,
    #[serde(rename = "JV Blue")]
    JvBlue,
    #[serde(rename = "JV Gold")]
    JvGold,
    #[serde(rename = "C Team")]
    CTeam,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerNeed {
    pub role: String,
    pub description: String,
    pub team: VolunteerTeam,
    pub filled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerSummary {
    pub varsity_gold: Vec<VolunteerNeed>,
    pub jv_blue: Vec<VolunteerNeed>,
    pub jv_gold: Vec<VolunteerNeed>,
    pub c_team: Vec<VolunteerNeed>,
    pub total_needs: usize,
    pub total_filled: usize,
}

// =============================================================================
// Governance records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaSection {
    pub header: String,
    pub body: Vec<String>,
}

/// Agenda markup split into a metadata block and bold-header sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredAgenda {
    pub metadata: Vec<String>,
    pub sections: Vec<AgendaSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMeeting {
    pub label: String,
    pub date: String,
    pub file_name: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingMinutes {
    pub date: String,
    pub title: String,
    pub file_name: String,
    pub year: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BylawsData {
    pub html_content: String,
    pub last_updated: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDocument {
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDocuments {
    pub irs: Vec<ComplianceDocument>,
    pub wa_sos: Vec<ComplianceDocument>,
    pub insurance: Vec<ComplianceDocument>,
    pub bank_recs: Vec<ComplianceDocument>,
}

// =============================================================================
// Derived records
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub severity: Severity,
    pub href: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    Page,
    Alumni,
    Sponsor,
    Compliance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub title: String,
    pub category: SearchCategory,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}
