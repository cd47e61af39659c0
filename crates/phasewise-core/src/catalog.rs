//! # Catalog
//!
//! The organisation's projects and the calendar plans linked to them.
//! This is fixed reference data; sessions are opened against it by id.

use crate::primitives::{AT_RISK_BELOW, NEEDS_ATTENTION_BELOW, PORTFOLIO_ON_TRACK_FROM};
use crate::{Percent, PhasewiseError, ProjectId};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH
// =============================================================================

/// Traffic-light summary of a project's overall progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectHealth {
    AtRisk,
    NeedsAttention,
    OnTrack,
}

impl ProjectHealth {
    #[must_use]
    pub fn from_progress(progress: Percent) -> Self {
        match progress.value() {
            p if p < AT_RISK_BELOW => ProjectHealth::AtRisk,
            p if p < NEEDS_ATTENTION_BELOW => ProjectHealth::NeedsAttention,
            _ => ProjectHealth::OnTrack,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ProjectHealth::AtRisk => "At risk",
            ProjectHealth::NeedsAttention => "Needs attention",
            ProjectHealth::OnTrack => "On track",
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A project in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: &'static str,
    pub description: &'static str,
    pub date: &'static str,
    pub location: &'static str,
    pub attendees: &'static str,
    pub details: &'static str,
    pub plan_ids: &'static [u32],
    /// Progress recorded for the project outside the phase board.
    pub progress: Option<Percent>,
}

impl Project {
    /// The seeded figure when there is one, otherwise the board aggregate.
    #[must_use]
    pub fn overall_progress(&self, board_aggregate: Percent) -> Percent {
        self.progress.unwrap_or(board_aggregate)
    }

    /// Health of the project given the board aggregate.
    #[must_use]
    pub fn health(&self, board_aggregate: Percent) -> ProjectHealth {
        ProjectHealth::from_progress(self.overall_progress(board_aggregate))
    }
}

/// A dated calendar activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub date: &'static str,
    pub location: &'static str,
    pub project_id: Option<ProjectId>,
}

// =============================================================================
// LOOKUPS
// =============================================================================

/// All projects, ordered by id.
#[must_use]
pub fn projects() -> &'static [Project] {
    &PROJECTS
}

/// All calendar plans, ordered by id.
#[must_use]
pub fn plans() -> &'static [Plan] {
    &PLANS
}

/// Look up a project.
pub fn project(id: ProjectId) -> Result<&'static Project, PhasewiseError> {
    projects()
        .iter()
        .find(|p| p.id == id)
        .ok_or(PhasewiseError::ProjectNotFound(id.0))
}

/// Plans linked to a project.
pub fn plans_for(project: ProjectId) -> impl Iterator<Item = &'static Plan> {
    plans().iter().filter(move |p| p.project_id == Some(project))
}

// =============================================================================
// PORTFOLIO
// =============================================================================

/// Suggested-action counts across the catalog.
///
/// Bands differ from [`ProjectHealth`]: at or above
/// [`PORTFOLIO_ON_TRACK_FROM`] is on track, below [`AT_RISK_BELOW`] is at
/// risk, anything between needs action. Projects with no recorded progress,
/// or 0%, are left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub on_track: usize,
    pub at_risk: usize,
    pub needs_action: usize,
}

impl PortfolioSummary {
    /// Tally a set of projects.
    #[must_use]
    pub fn tally<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Self {
        let mut summary = Self::default();
        for progress in projects.into_iter().filter_map(|p| p.progress) {
            match progress.value() {
                0 => {}
                p if p >= PORTFOLIO_ON_TRACK_FROM => summary.on_track += 1,
                p if p < AT_RISK_BELOW => summary.at_risk += 1,
                _ => summary.needs_action += 1,
            }
        }
        summary
    }
}

/// The summary over every catalog project.
#[must_use]
pub fn portfolio_summary() -> PortfolioSummary {
    PortfolioSummary::tally(projects())
}

// =============================================================================
// DATA
// =============================================================================

const fn project_entry(
    id: u32,
    name: &'static str,
    description: &'static str,
    date: &'static str,
    location: &'static str,
    attendees: &'static str,
    details: &'static str,
    plan_ids: &'static [u32],
    progress: u8,
) -> Project {
    Project {
        id: ProjectId(id),
        name,
        description,
        date,
        location,
        attendees,
        details,
        plan_ids,
        progress: Some(Percent::new(progress)),
    }
}

const fn plan_entry(
    id: u32,
    name: &'static str,
    description: &'static str,
    date: &'static str,
    location: &'static str,
    project: u32,
) -> Plan {
    Plan {
        id,
        name,
        description,
        date,
        location,
        project_id: Some(ProjectId(project)),
    }
}

static PROJECTS: [Project; 16] = [
    project_entry(
        1,
        "Arundel Sabbath",
        "Host a Sabbath program at Arundel Hospital.",
        "01 February 2025",
        "Arundel Hospital",
        "the sick, beneficiaries with testimonies, nurses and staff",
        "This program aims to provide spiritual support and comfort to patients and hospital staff.",
        &[6, 17, 18],
        45,
    ),
    project_entry(
        2,
        "GC/SID CPE&CPO TRAINING",
        "To Conduct a CPE & CPO Training seminar at SID Offices.",
        "19-24 January 2025",
        "SID Offices",
        "60+ SID pastors. Tutors: CCS & GC Chaplaincy Director",
        "This training will equip pastors with chaplaincy skills and knowledge for their ministry.",
        &[],
        30,
    ),
    project_entry(
        3,
        "SID ENDORSEMENTS",
        "To attend and be endorsed during the SID Endorsement Big Sabbath.",
        "25 January 2025",
        "SID Headquarters",
        "SID Leadership and Chaplaincy Department",
        "This is a formal endorsement of our chaplaincy services by the Southern Africa-Indian Ocean Division, providing official recognition and support for our work.",
        &[],
        25,
    ),
    project_entry(
        4,
        "Trojan Mine SDA Church building",
        "To complete the Church building at Trojan Mine and dedicate it at the end of the Evangelistic Campaign.",
        "12 April 2025",
        "Trojan Mine",
        "Church members and community",
        "This project involves completing construction of a church building that will serve the Trojan Mine community, providing a place of worship and spiritual growth.",
        &[4],
        60,
    ),
    project_entry(
        5,
        "ZPCS & BGF RADIO STATION",
        "To launch and run a radio station in partnership with ZPCS.",
        "17 February 2025",
        "At the old death penalty room",
        "ZPCS staff and BGF team",
        "This innovative project will transform a space formerly associated with punishment into one that broadcasts hope, healing, and spiritual support.",
        &[10],
        35,
    ),
    project_entry(
        6,
        "ZRP CHAPLAINCY DIPLOMA AT SOLUSI",
        "100 ZRP Chaplains to attend their last two semesters at Solusi University.",
        "2-31 March and 1-31 July 2025",
        "Solusi University",
        "100 ZRP Chaplains",
        "Graduation is in November. This educational program will equip police chaplains with advanced training to better serve officers and the community.",
        &[],
        20,
    ),
    project_entry(
        7,
        "UNIFORMED FORCES CHAPLAINCY SEMINARS",
        "To conduct a 2-day seminar with ZPCS, ZRP & ZNA Chaplains.",
        "To be advised",
        "Harare Conference Center",
        "ZPCS, ZRP & ZNA Chaplains",
        "This collaborative training will strengthen chaplaincy services across all uniformed forces, promoting best practices and shared resources.",
        &[11],
        15,
    ),
    project_entry(
        8,
        "VOCATIONAL TRAINING CENTRES CHAPLAINCY",
        "To introduce and provide chaplaincy services to vocational training centres and National Youth Service centres under Ministry of Youth.",
        "Throughout 2025",
        "Various training centers",
        "Youth in vocational training",
        "This initiative will extend spiritual care and support to young people during their vocational training, helping them develop holistically.",
        &[5, 12, 13, 14],
        25,
    ),
    project_entry(
        9,
        "ZRP COMMISSIONER DEDICATION PROGRAM",
        "To conduct a dedication program for the new commission general of police.",
        "19 January 2025",
        "ZRP Headquarters",
        "ZRP leadership and officers",
        "This important ceremony will provide spiritual blessing and guidance for the new police leadership, emphasizing ethical service and compassionate policing.",
        &[16],
        70,
    ),
    project_entry(
        10,
        "ACHIEVEMENT CLASSES",
        "Introduce achievement classes to all the schools we are providing chaplaincy services to.",
        "February 2025",
        "Partner schools",
        "School students and teachers",
        "Using the pathfinders and adventurers curriculum. This program will enhance character development and life skills for students through structured, values-based activities.",
        &[7, 8],
        40,
    ),
    project_entry(
        11,
        "GC CHAPLAINCY CONGRESS",
        "To attend and present at the GC Chaplaincy world congress in America.",
        "29 June-2 July 2025",
        "United States of America",
        "International chaplaincy representatives",
        "This international gathering will allow us to share our experiences and learn from chaplains worldwide, bringing back valuable insights to enhance our local services.",
        &[],
        10,
    ),
    project_entry(
        12,
        "ZITF BOOTH",
        "To attend ZITF and have a stand for counselling, prayers and free literature distribution.",
        "22-26 April 2025",
        "Zimbabwe International Trade Fair, Bulawayo",
        "Trade fair visitors and exhibitors",
        "The Zimbabwe International Trade Fair provides an excellent opportunity to reach the public with our services and resources, increasing awareness of chaplaincy support.",
        &[],
        30,
    ),
    project_entry(
        13,
        "WHATSAPP AI CHAT BOT",
        "Develop an AI WhatsApp chat bot which provides automatic and instant responses to clients.",
        "Ongoing development",
        "Digital platform",
        "All clients and chaplains",
        "The Bot can link client to a chaplain on a case to case basis. This technology will make spiritual support more accessible, providing immediate response to those in need.",
        &[],
        55,
    ),
    project_entry(
        14,
        "SPORTS CHAPLAINCY",
        "Introduce chaplaincy to sports teams.",
        "Throughout 2025",
        "Various sports venues",
        "Athletes and coaching staff",
        "We currently are providing such to Trojan Stars FC, Pitch to Scotland FC, etc. This specialized chaplaincy addresses the unique spiritual and emotional needs of athletes and teams.",
        &[],
        20,
    ),
    project_entry(
        15,
        "BGF REHABILITATION CENTRE",
        "Proposal to set up a Rehabilitation Centre which uses the 12 Steps of Recovery.",
        "Planning phase",
        "To be determined",
        "Individuals in recovery and support staff",
        "This center will provide structured support for individuals recovering from various addictions and challenges, using an established and effective approach.",
        &[9, 15],
        15,
    ),
    project_entry(
        16,
        "WOSE Activities",
        "Weeks of Spiritual Emphasis across all companies throughout the year.",
        "Throughout 2025",
        "All partner companies",
        "Company employees and management",
        "This ongoing program provides regular spiritual guidance and support to employees at all partner companies, fostering spiritual growth and well-being in the workplace.",
        &[1, 2, 3],
        50,
    ),
];

static PLANS: [Plan; 18] = [
    plan_entry(
        1,
        "WOSE - Q1",
        "To conduct physical or online weeks of spiritual emphasis at each company. The online WOSE will be done through the website chatrooms.",
        "2025-02-10",
        "All Companies",
        16,
    ),
    plan_entry(
        2,
        "WOSE - Q2",
        "Second quarter weeks of spiritual emphasis at each company.",
        "2025-05-12",
        "All Companies",
        16,
    ),
    plan_entry(
        3,
        "WOSE - Q3",
        "Third quarter weeks of spiritual emphasis at each company.",
        "2025-08-18",
        "All Companies",
        16,
    ),
    plan_entry(
        4,
        "EVANGELISTIC CAMPAIGN - Trojan Mine",
        "Conduct 1 week evangelistic campaign at Trojan Mine.",
        "2025-03-15",
        "Trojan Mine",
        4,
    ),
    plan_entry(
        5,
        "EVANGELISTIC CAMPAIGN - Zimphos",
        "Conduct 1 week evangelistic campaign at Zimphos.",
        "2025-07-20",
        "Zimphos",
        8,
    ),
    plan_entry(
        6,
        "MENTAL HEALTH SEMINAR",
        "To conduct seminar with mental health specialists.",
        "2025-04-05",
        "Arundel Hospital",
        1,
    ),
    plan_entry(
        7,
        "MARRIAGE & FAMILY SEMINAR",
        "To conduct seminar with marriage and family specialists.",
        "2025-06-14",
        "Harare Conference Center",
        10,
    ),
    plan_entry(
        8,
        "FINANCIAL LITERACY SEMINAR",
        "To conduct seminar with financial literacy specialists.",
        "2025-09-22",
        "Bulawayo Training Center",
        10,
    ),
    plan_entry(
        9,
        "DRUG ABUSE SEMINAR",
        "To conduct seminar with drug abuse specialists.",
        "2025-10-11",
        "ZRP Headquarters",
        15,
    ),
    plan_entry(
        10,
        "COMMUNICATION SEMINAR",
        "To conduct seminar with communication specialists.",
        "2025-11-08",
        "ZPCS Training Academy",
        5,
    ),
    plan_entry(
        11,
        "SPIRITUALISM SEMINAR",
        "To conduct seminar with spiritualism specialists.",
        "2025-12-06",
        "Harare Conference Center",
        7,
    ),
    plan_entry(
        12,
        "CANCER AWARENESS MONTH",
        "Run targeted campaigns for cancer awareness month.",
        "2025-10-15",
        "All Companies",
        8,
    ),
    plan_entry(
        13,
        "FATHERS DAY PROGRAM",
        "Special program for fathers day.",
        "2025-06-15",
        "All Companies",
        8,
    ),
    plan_entry(
        14,
        "MOTHERS DAY PROGRAM",
        "Special program for mothers day.",
        "2025-05-11",
        "All Companies",
        8,
    ),
    plan_entry(
        15,
        "SUICIDE PREVENTION MONTH",
        "Run targeted campaigns for suicide prevention month.",
        "2025-09-10",
        "All Companies",
        15,
    ),
    plan_entry(
        16,
        "ZRP DEVOTIONS",
        "To conduct devotions during the morning parade at ZRP HQ.",
        "2025-01-15",
        "ZRP Headquarters",
        9,
    ),
    plan_entry(
        17,
        "ARUNDEL STAFF DEVOTIONS",
        "Conduct staff devotions at Arundel Hospital.",
        "2025-02-28",
        "Arundel Hospital",
        1,
    ),
    plan_entry(
        18,
        "ARUNDEL OUTPATIENTS DEVOTIONS",
        "Conduct outpatients devotions at Arundel Hospital.",
        "2025-03-28",
        "Arundel Hospital",
        1,
    ),
];

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_sizes() {
        assert_eq!(projects().len(), 16);
        assert_eq!(plans().len(), 18);
    }

    #[test]
    fn project_lookup() {
        let arundel = project(ProjectId(1)).expect("project 1");
        assert_eq!(arundel.name, "Arundel Sabbath");
        assert!(matches!(
            project(ProjectId(99)),
            Err(PhasewiseError::ProjectNotFound(99))
        ));
    }

    #[test]
    fn plan_links_agree_with_project_plan_ids() {
        for project in projects() {
            let mut linked: Vec<u32> = plans_for(project.id).map(|p| p.id).collect();
            linked.sort_unstable();
            assert_eq!(linked, project.plan_ids, "project {}", project.id);
        }
    }

    #[test]
    fn portfolio_summary_counts_bands() {
        assert_eq!(
            portfolio_summary(),
            PortfolioSummary {
                on_track: 9,
                at_risk: 3,
                needs_action: 4,
            }
        );
    }

    #[test]
    fn portfolio_summary_skips_unrecorded_and_zero() {
        let base = project(ProjectId(1)).expect("project 1");
        let with = |progress: Option<u8>| Project {
            progress: progress.map(Percent::new),
            ..base.clone()
        };
        let sample = [with(None), with(Some(0)), with(Some(19)), with(Some(20)), with(Some(29)), with(Some(30))];

        assert_eq!(
            PortfolioSummary::tally(&sample),
            PortfolioSummary {
                on_track: 1,
                at_risk: 1,
                needs_action: 2,
            }
        );
    }

    #[test]
    fn health_thresholds() {
        assert_eq!(ProjectHealth::from_progress(Percent::new(19)), ProjectHealth::AtRisk);
        assert_eq!(ProjectHealth::from_progress(Percent::new(20)), ProjectHealth::NeedsAttention);
        assert_eq!(ProjectHealth::from_progress(Percent::new(49)), ProjectHealth::NeedsAttention);
        assert_eq!(ProjectHealth::from_progress(Percent::new(50)), ProjectHealth::OnTrack);
    }

    #[test]
    fn seeded_progress_wins_over_board() {
        let dedication = project(ProjectId(9)).expect("project 9");
        assert_eq!(dedication.overall_progress(Percent::ZERO).value(), 70);
        assert_eq!(dedication.health(Percent::ZERO), ProjectHealth::OnTrack);

        let unseeded = Project {
            progress: None,
            ..dedication.clone()
        };
        assert_eq!(unseeded.overall_progress(Percent::new(12)).value(), 12);
    }
}
