//! Fixed vocabularies. Matching is by lower-case substring containment.

/// Phrases signalling urgency or a compliance obligation.
pub const CRITICAL_KEYWORDS: &[&str] = &[
    "urgent",
    "emergency",
    "critical",
    "immediate",
    "safety hazard",
    "accident",
    "injury",
    "failure",
    "breach",
    "violation",
    "deadline",
    "overdue",
    "compliance required",
    "regulatory",
];

/// Matched phrases that make an escalation a deadline alert rather than a
/// compliance one.
pub const DEADLINE_KEYWORDS: &[&str] = &["deadline", "overdue"];

const OPERATIONS_KEYWORDS: &[&str] = &[
    "operations",
    "train",
    "schedule",
    "maintenance",
    "station",
    "service",
];

const ENGINEERING_KEYWORDS: &[&str] = &[
    "engineering",
    "technical",
    "design",
    "construction",
    "infrastructure",
    "system",
];

const FINANCE_KEYWORDS: &[&str] = &[
    "finance",
    "budget",
    "cost",
    "payment",
    "invoice",
    "accounting",
    "expenditure",
];

const HR_KEYWORDS: &[&str] = &[
    "hr",
    "human resources",
    "employee",
    "recruitment",
    "payroll",
    "benefits",
];

const IT_KEYWORDS: &[&str] = &[
    "it",
    "information technology",
    "software",
    "hardware",
    "network",
    "system",
    "database",
];

const PROCUREMENT_KEYWORDS: &[&str] = &[
    "procurement",
    "purchase",
    "vendor",
    "supplier",
    "contract",
    "tender",
];

const SAFETY_KEYWORDS: &[&str] = &[
    "safety",
    "security",
    "hazard",
    "risk",
    "protocol",
    "emergency",
    "accident",
];

/// Departments in scoring order, each with its vocabulary.
///
/// Order matters: among equal top scores the last department listed wins.
pub const DEPARTMENTS: &[(&str, &[&str])] = &[
    ("Operations", OPERATIONS_KEYWORDS),
    ("Engineering", ENGINEERING_KEYWORDS),
    ("Finance", FINANCE_KEYWORDS),
    ("Human Resources", HR_KEYWORDS),
    ("IT", IT_KEYWORDS),
    ("Procurement", PROCUREMENT_KEYWORDS),
    ("Safety", SAFETY_KEYWORDS),
];
