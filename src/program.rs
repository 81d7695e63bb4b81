//! Static program metadata: dashboard pages, sponsors and the compliance
//! checklist. Refreshed by hand, never fetched.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub title: &'static str,
    pub href: &'static str,
    pub subtitle: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sponsor {
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceItem {
    pub title: &'static str,
    pub subtitle: &'static str,
}

const fn page(title: &'static str, href: &'static str, subtitle: &'static str) -> Page {
    Page {
        title,
        href,
        subtitle,
    }
}

pub const PAGES: [Page; 18] = [
    page("Executive Summary", "/", "Overview"),
    page("Financials", "/financials", "Budget overview"),
    page("Budget Detail", "/financials/budget", "Line-by-line budget"),
    page("Transactions", "/financials/transactions", "Square transactions"),
    page("Coach's Fund", "/financials/coaches-fund", "Coach fund tracking"),
    page("Fundraising", "/fundraising", "Revenue events"),
    page("AI Insights", "/fundraising/insights", "Fundraising analysis"),
    page("Operations", "/operations", "Ops overview"),
    page("Rosters", "/operations/rosters", "Team rosters"),
    page("Uniforms", "/operations/uniforms", "Uniform inventory"),
    page("Volunteers", "/operations/volunteers", "Volunteer needs"),
    page("Events", "/operations/events", "Calendar"),
    page("Governance", "/governance", "Board info"),
    page("Bylaws", "/governance/bylaws", "Organization bylaws"),
    page("Board Meetings", "/governance/agendas", "Agendas & minutes"),
    page("Compliance", "/compliance", "Regulatory filings"),
    page("Program", "/program", "School & team info"),
    page("Sponsorships", "/sponsorships", "Sponsors & alumni"),
];

pub const SPONSORS: [Sponsor; 10] = [
    Sponsor { name: "Success Martial Arts" },
    Sponsor { name: "Rock Creek Baseball" },
    Sponsor { name: "Tim McEwen - Keller Williams" },
    Sponsor { name: "P&D Tree Service" },
    Sponsor { name: "Grace Glove Company" },
    Sponsor { name: "Edgewood Sheds (Old Hickory)" },
    Sponsor { name: "Oakhearth Homes" },
    Sponsor { name: "Country Financial" },
    Sponsor { name: "Emerald City Smoothie" },
    Sponsor { name: "Farrelli's Pizza" },
];

pub const COMPLIANCE_ITEMS: [ComplianceItem; 5] = [
    ComplianceItem {
        title: "IRS 990N Filing",
        subtitle: "Tax-exempt status",
    },
    ComplianceItem {
        title: "WA SOS Annual Report",
        subtitle: "State registration",
    },
    ComplianceItem {
        title: "Insurance Policy",
        subtitle: "Liability & D&O",
    },
    ComplianceItem {
        title: "Financial Review/Audit",
        subtitle: "Annual audit",
    },
    ComplianceItem {
        title: "Officer Elections",
        subtitle: "Annual meeting",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_hrefs_are_unique_and_rooted() {
        let mut hrefs: Vec<&str> = PAGES.iter().map(|p| p.href).collect();
        assert!(hrefs.iter().all(|h| h.starts_with('/')));
        hrefs.sort_unstable();
        hrefs.dedup();
        assert_eq!(hrefs.len(), PAGES.len());
    }
}
