//! # Phase Schema
//!
//! One declarative table per phase: its sections, which record kinds each
//! section accepts, the tasks it is seeded with and the progress rule. The
//! single [`crate::PhaseEditor`] is driven entirely by this table.
//!
//! Each phase also offers three ready-made [`Suggestion`]s that can be added
//! to any task checklist in the phase.

use crate::content::{Extra, ImpactMetric, Kpi, PhaseContent, RecordKind, Section, Task};
use crate::lifecycle::PhaseKind;
use crate::ItemId;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

// =============================================================================
// DEFINITIONS
// =============================================================================

/// How a phase turns its content into a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressRule {
    /// Completed tasks over all tasks.
    TaskRatio,
    /// Tasks, SMART goal flags and one unit per written section.
    ConceptMix,
}

/// A task present in a section before any edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTask {
    pub id: &'static str,
    pub title: &'static str,
    pub due_date: Option<&'static str>,
    pub assignee: Option<&'static str>,
}

const fn task(id: &'static str, title: &'static str) -> SeedTask {
    SeedTask {
        id,
        title,
        due_date: None,
        assignee: None,
    }
}

const fn scheduled(
    id: &'static str,
    title: &'static str,
    due_date: &'static str,
    assignee: &'static str,
) -> SeedTask {
    SeedTask {
        id,
        title,
        due_date: Some(due_date),
        assignee: Some(assignee),
    }
}

impl SeedTask {
    fn build(&self) -> Task {
        Task {
            due_date: self.due_date.map(str::to_string),
            assignee: self.assignee.map(str::to_string),
            ..Task::new(self.id, self.title)
        }
    }
}

/// When a suggested task falls due, counted from the day it is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueIn {
    Today,
    NextWeek,
    NextMonth,
}

impl DueIn {
    #[must_use]
    pub fn days(&self) -> u64 {
        match self {
            DueIn::Today => 0,
            DueIn::NextWeek => 7,
            DueIn::NextMonth => 30,
        }
    }
}

/// A task a phase offers ready-made, with an owner and a relative due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub title: &'static str,
    pub due_in: DueIn,
    pub assignee: &'static str,
}

const fn suggest(title: &'static str, due_in: DueIn, assignee: &'static str) -> Suggestion {
    Suggestion {
        title,
        due_in,
        assignee,
    }
}

impl Suggestion {
    /// Due date when the suggestion is taken up on `today`.
    #[must_use]
    pub fn due_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(self.due_in.days()))
            .unwrap_or(today)
    }

    /// The task this suggestion becomes.
    #[must_use]
    pub fn task(&self, id: ItemId, today: NaiveDate) -> Task {
        let due = self.due_date(today).format("%Y-%m-%d").to_string();
        Task::new(id, self.title).scheduled(&due, self.assignee)
    }
}

/// One section of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDef {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Whether the section keeps a task list.
    pub tasks: bool,
    pub extras: &'static [Extra],
    pub seed_tasks: &'static [SeedTask],
}

impl SectionDef {
    /// Whether records of `kind` may be added here.
    #[must_use]
    pub fn grants(&self, kind: RecordKind) -> bool {
        match kind.required_extra() {
            None => self.tasks,
            Some(extra) => self.extras.contains(&extra),
        }
    }

    /// The section as it exists before any edits.
    #[must_use]
    pub fn seed(&self) -> Section {
        let mut section = Section::new(self.key, self.title, self.description);
        section.tasks = self.seed_tasks.iter().map(SeedTask::build).collect();
        if self.extras.contains(&Extra::Kpis) {
            section.kpis = default_kpis();
        }
        if self.extras.contains(&Extra::ImpactMetrics) {
            section.impact_metrics = default_impact_metrics();
        }
        section
    }
}

/// The full schema of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSchema {
    pub kind: PhaseKind,
    pub sections: &'static [SectionDef],
    pub rule: ProgressRule,
    pub suggestions: &'static [Suggestion],
}

impl PhaseSchema {
    /// Schema of a phase.
    #[must_use]
    pub fn of(kind: PhaseKind) -> &'static PhaseSchema {
        match kind {
            PhaseKind::Concept => &CONCEPT,
            PhaseKind::Feasibility => &FEASIBILITY,
            PhaseKind::Planning => &PLANNING,
            PhaseKind::Implementation => &IMPLEMENTATION,
            PhaseKind::Monitoring => &MONITORING,
            PhaseKind::Reporting => &REPORTING,
        }
    }

    /// Look up a section definition.
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&'static SectionDef> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// A suggested task by position.
    #[must_use]
    pub fn suggestion(&self, index: usize) -> Option<&'static Suggestion> {
        self.suggestions.get(index)
    }

    /// Default content: every section seeded.
    #[must_use]
    pub fn seed_content(&self) -> PhaseContent {
        PhaseContent::new(self.sections.iter().map(SectionDef::seed).collect())
    }

    /// Bring previously saved content in line with the schema.
    ///
    /// Missing sections are seeded, blank titles and descriptions are
    /// restored and budget totals are recomputed from their items. Sections
    /// the schema does not know are kept as they are.
    #[must_use]
    pub fn complete(&self, saved: PhaseContent) -> PhaseContent {
        let mut content = saved;
        for def in self.sections {
            match content.section(def.key) {
                None => content.push_section(def.seed()),
                Some(existing) if existing.title.is_empty() || existing.description.is_empty() => {
                    let mut section = existing.clone();
                    if section.title.is_empty() {
                        section.title = def.title.to_string();
                    }
                    if section.description.is_empty() {
                        section.description = def.description.to_string();
                    }
                    content.replace_section(section);
                }
                Some(_) => {}
            }
        }
        content.recalculate_budgets();
        content
    }
}

/// KPIs every monitoring section starts with.
#[must_use]
pub fn default_kpis() -> Vec<Kpi> {
    vec![
        Kpi::new("kpi1", "Beneficiaries Reached", 1000, 850, "people"),
        Kpi::new("kpi2", "Activities Completed", 25, 22, "activities"),
        Kpi::new("kpi3", "Budget Utilization", 100_000, 92_000, "USD"),
        Kpi::new("kpi4", "Stakeholder Satisfaction", 90, 85, "%"),
    ]
}

/// Impact metrics every final report starts with.
#[must_use]
pub fn default_impact_metrics() -> Vec<ImpactMetric> {
    vec![
        ImpactMetric::new(
            "im1",
            "Lives Improved",
            850,
            "Number of individuals who directly benefited from the project with improved quality of life",
        ),
        ImpactMetric::new(
            "im2",
            "Knowledge Increase",
            85,
            "Percentage increase in knowledge among participants based on pre/post assessments",
        ),
        ImpactMetric::new(
            "im3",
            "Community Engagement",
            25,
            "Number of community organizations actively participating in the project",
        ),
        ImpactMetric::new(
            "im4",
            "Sustainability Score",
            76,
            "Overall sustainability score (0-100) based on financial, social, and environmental factors",
        ),
    ]
}

// =============================================================================
// TABLES
// =============================================================================

static CONCEPT: PhaseSchema = PhaseSchema {
    kind: PhaseKind::Concept,
    rule: ProgressRule::ConceptMix,
    sections: &[
        SectionDef {
            key: "problem",
            title: "Problem Statement",
            description: "What gap or need does the project address?",
            tasks: true,
            extras: &[],
            seed_tasks: &[],
        },
        SectionDef {
            key: "idea",
            title: "Solution Concept",
            description: "Brainstorm and outline the core concept or solution.",
            tasks: true,
            extras: &[],
            seed_tasks: &[],
        },
        SectionDef {
            key: "objectives",
            title: "SMART Objectives",
            description: "SMART goals: Specific, Measurable, Achievable, Relevant, Time-bound.",
            tasks: false,
            extras: &[Extra::Goals],
            seed_tasks: &[],
        },
    ],
    suggestions: &[
        suggest("Conduct stakeholder interviews", DueIn::NextWeek, "Project Manager"),
        suggest("Research similar projects", DueIn::NextWeek, "Research Team"),
        suggest("Draft initial concept document", DueIn::NextMonth, "Project Lead"),
    ],
};

static FEASIBILITY: PhaseSchema = PhaseSchema {
    kind: PhaseKind::Feasibility,
    rule: ProgressRule::TaskRatio,
    sections: &[
        SectionDef {
            key: "market",
            title: "Market Research",
            description: "Demand, beneficiaries, competitors, trends.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                task("m1", "Identify target beneficiaries"),
                task("m2", "Analyze demand for services"),
                task("m3", "Research similar initiatives"),
                task("m4", "Document market trends"),
            ],
        },
        SectionDef {
            key: "technical",
            title: "Technical Feasibility",
            description: "Is it possible to execute (skills, tools, systems)?",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                task("t1", "Assess required skills"),
                task("t2", "Evaluate available tools and systems"),
                task("t3", "Identify technical constraints"),
                task("t4", "Determine technical requirements"),
            ],
        },
        SectionDef {
            key: "financial",
            title: "Financial Feasibility",
            description: "Costs, revenue, ROI, funding sources.",
            tasks: true,
            extras: &[Extra::Budget],
            seed_tasks: &[
                task("f1", "Estimate project costs"),
                task("f2", "Identify potential funding sources"),
                task("f3", "Calculate ROI or impact metrics"),
                task("f4", "Develop preliminary budget"),
            ],
        },
        SectionDef {
            key: "risk",
            title: "Risk Assessment",
            description: "Identify risks and mitigation strategies.",
            tasks: true,
            extras: &[Extra::Risks],
            seed_tasks: &[
                task("r1", "Identify potential risks"),
                task("r2", "Assess probability and impact"),
                task("r3", "Develop mitigation strategies"),
                task("r4", "Create risk management plan"),
            ],
        },
    ],
    suggestions: &[
        suggest("Conduct market analysis", DueIn::NextWeek, "Market Analyst"),
        suggest("Prepare financial projections", DueIn::NextMonth, "Finance Officer"),
        suggest("Assess technical requirements", DueIn::NextWeek, "Technical Lead"),
    ],
};

static PLANNING: PhaseSchema = PhaseSchema {
    kind: PhaseKind::Planning,
    rule: ProgressRule::TaskRatio,
    sections: &[
        SectionDef {
            key: "proposal",
            title: "Project Proposal",
            description: "Include all components: objectives, budget, timelines, partners, etc.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                task("p1", "Define project scope"),
                task("p2", "Set clear objectives"),
                task("p3", "Identify key stakeholders"),
                task("p4", "Draft full proposal document"),
            ],
        },
        SectionDef {
            key: "workplan",
            title: "Work Plan",
            description: "Tasks, roles, responsibilities, schedule (Gantt chart or calendar).",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                task("w1", "Break down project into tasks"),
                task("w2", "Assign responsibilities"),
                task("w3", "Create timeline with milestones"),
                task("w4", "Develop communication plan"),
            ],
        },
        SectionDef {
            key: "budget",
            title: "Budgeting",
            description: "Detailed financial breakdown.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                task("b1", "Itemize all expenses"),
                task("b2", "Research accurate cost estimates"),
                task("b3", "Include contingency funds"),
                task("b4", "Create budget spreadsheet"),
            ],
        },
        SectionDef {
            key: "funding",
            title: "Secure Funding",
            description: "Grants, investors, loans, partnerships.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                task("f1", "Identify potential funding sources"),
                task("f2", "Prepare funding applications/pitches"),
                task("f3", "Develop partnerships"),
                task("f4", "Create funding tracking system"),
            ],
        },
    ],
    suggestions: &[
        suggest("Create project timeline", DueIn::NextWeek, "Project Manager"),
        suggest("Develop budget breakdown", DueIn::NextWeek, "Finance Officer"),
        suggest("Assign team responsibilities", DueIn::Today, "Project Lead"),
    ],
};

static IMPLEMENTATION: PhaseSchema = PhaseSchema {
    kind: PhaseKind::Implementation,
    rule: ProgressRule::TaskRatio,
    sections: &[
        SectionDef {
            key: "mobilization",
            title: "Mobilization",
            description: "Team recruitment, resource purchase, site prep.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                scheduled("m1", "Recruit project team members", "2025-03-01", "Project Manager"),
                scheduled("m2", "Purchase necessary equipment", "2025-03-10", "Procurement Officer"),
                scheduled("m3", "Prepare implementation site", "2025-03-15", "Site Coordinator"),
                scheduled("m4", "Conduct team orientation", "2025-03-20", "Project Manager"),
            ],
        },
        SectionDef {
            key: "execution",
            title: "Execution",
            description: "Start project activities according to plan.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                scheduled("e1", "Launch kickoff meeting", "2025-04-01", "Project Manager"),
                scheduled("e2", "Implement core activities", "2025-04-15", "Implementation Team"),
                scheduled("e3", "Track progress against timeline", "2025-04-30", "Project Coordinator"),
                scheduled("e4", "Conduct regular team check-ins", "2025-05-15", "Project Manager"),
            ],
        },
        SectionDef {
            key: "documentation",
            title: "Documentation",
            description: "Record every stage: photos, reports, receipts, milestones.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                scheduled("d1", "Take photos of implementation", "2025-05-01", "Documentation Officer"),
                scheduled("d2", "Collect receipts and invoices", "2025-05-10", "Finance Officer"),
                scheduled("d3", "Write progress reports", "2025-05-20", "Project Coordinator"),
                scheduled("d4", "Document milestone achievements", "2025-05-30", "Project Manager"),
            ],
        },
    ],
    suggestions: &[
        suggest("Schedule kickoff meeting", DueIn::Today, "Project Manager"),
        suggest("Set up project tracking system", DueIn::NextWeek, "Project Coordinator"),
        suggest("Prepare implementation site", DueIn::NextWeek, "Site Manager"),
    ],
};

static MONITORING: PhaseSchema = PhaseSchema {
    kind: PhaseKind::Monitoring,
    rule: ProgressRule::TaskRatio,
    sections: &[
        SectionDef {
            key: "monitoring",
            title: "Monitoring",
            description: "Track progress (weekly/monthly reports, KPIs).",
            tasks: true,
            extras: &[Extra::Kpis],
            seed_tasks: &[
                task("m1", "Establish monitoring framework"),
                task("m2", "Collect data regularly"),
                task("m3", "Track KPIs"),
                task("m4", "Prepare monitoring reports"),
            ],
        },
        SectionDef {
            key: "evaluation",
            title: "Evaluation",
            description: "Compare actual vs. planned outcomes.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                task("e1", "Analyze collected data"),
                task("e2", "Compare results with objectives"),
                task("e3", "Identify successes and challenges"),
                task("e4", "Document lessons learned"),
            ],
        },
        SectionDef {
            key: "adjustments",
            title: "Adjustments",
            description: "Realign where necessary: budget, team, timeline.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                task("a1", "Identify areas needing adjustment"),
                task("a2", "Develop adjustment strategies"),
                task("a3", "Implement necessary changes"),
                task("a4", "Document all adjustments"),
            ],
        },
    ],
    suggestions: &[
        suggest("Create monitoring framework", DueIn::NextWeek, "M&E Officer"),
        suggest("Schedule regular progress reviews", DueIn::Today, "Project Manager"),
        suggest("Set up data collection tools", DueIn::NextWeek, "Data Analyst"),
    ],
};

static REPORTING: PhaseSchema = PhaseSchema {
    kind: PhaseKind::Reporting,
    rule: ProgressRule::TaskRatio,
    sections: &[
        SectionDef {
            key: "report",
            title: "Final Report",
            description: "Results, lessons learned, challenges, and successes.",
            tasks: true,
            extras: &[Extra::ImpactMetrics],
            seed_tasks: &[
                task("r1", "Compile all project data"),
                task("r2", "Document achievements and challenges"),
                task("r3", "Analyze lessons learned"),
                task("r4", "Prepare comprehensive final report"),
            ],
        },
        SectionDef {
            key: "impact",
            title: "Impact Assessment",
            description: "Long-term benefits and sustainability.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                task("i1", "Assess direct and indirect impacts"),
                task("i2", "Evaluate sustainability factors"),
                task("i3", "Document long-term benefits"),
                task("i4", "Prepare impact assessment report"),
            ],
        },
        SectionDef {
            key: "presentation",
            title: "Stakeholder Presentation",
            description: "Share results with funders, partners, community, etc.",
            tasks: true,
            extras: &[],
            seed_tasks: &[
                task("p1", "Prepare presentation materials"),
                task("p2", "Schedule stakeholder meetings"),
                task("p3", "Deliver presentations"),
                task("p4", "Collect stakeholder feedback"),
            ],
        },
    ],
    suggestions: &[
        suggest("Collect final project metrics", DueIn::NextWeek, "M&E Officer"),
        suggest("Draft final report", DueIn::NextMonth, "Project Manager"),
        suggest("Prepare presentation for stakeholders", DueIn::NextMonth, "Communications Officer"),
    ],
};

// =============================================================================
// TESTS
// =============================================================================
