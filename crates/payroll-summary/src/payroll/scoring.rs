use serde::{Deserialize, Serialize};

/// How much detail an agency publishes for one financial dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclosureLevel {
    #[default]
    Absent,
    Partial,
    Detailed,
}

impl DisclosureLevel {
    pub const fn weight(self) -> f64 {
        match self {
            Self::Absent => 0.0,
            Self::Partial => 0.5,
            Self::Detailed => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Absent => "Absent",
            Self::Partial => "Partial",
            Self::Detailed => "Detailed",
        }
    }
}

/// How the payroll had to be obtained from the agency's portal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMethod {
    Direct,
    #[serde(alias = "scraping_hindered")]
    ScrapingFriendly,
    #[default]
    UserSimulationRequired,
}

impl AccessMethod {
    pub const fn weight(self) -> f64 {
        match self {
            Self::Direct => 1.0,
            Self::ScrapingFriendly => 0.5,
            Self::UserSimulationRequired => 0.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Direct => "Direct access",
            Self::ScrapingFriendly => "Scraping friendly",
            Self::UserSimulationRequired => "Requires user simulation",
        }
    }
}

/// Collection metadata supplied with every agency-month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataFlags {
    pub no_login_required: bool,
    pub no_captcha_required: bool,
    pub access: AccessMethod,
    pub open_format: bool,
    pub extension: Option<String>,
    pub strictly_tabular: bool,
    pub consistent_format: bool,
    pub has_enrollment: bool,
    pub has_workplace: bool,
    pub has_role: bool,
    pub base_revenue: DisclosureLevel,
    pub other_revenue: DisclosureLevel,
    pub expenditure: DisclosureLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisclosureScore {
    pub completeness_score: f64,
    pub easiness_score: f64,
    pub score: f64,
}

impl DisclosureScore {
    /// Reported for manual collections, whose metadata is not comparable.
    pub const fn zero() -> Self {
        Self {
            completeness_score: 0.0,
            easiness_score: 0.0,
            score: 0.0,
        }
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Share of the six completeness factors the agency satisfies.
pub fn completeness_score(meta: &MetadataFlags) -> f64 {
    let factors = [
        flag(meta.has_enrollment),
        flag(meta.has_workplace),
        flag(meta.has_role),
        meta.base_revenue.weight(),
        meta.other_revenue.weight(),
        meta.expenditure.weight(),
    ];
    factors.iter().sum::<f64>() / factors.len() as f64
}

/// Share of the five easiness factors the agency satisfies.
pub fn easiness_score(meta: &MetadataFlags) -> f64 {
    let factors = [
        flag(meta.no_login_required),
        flag(meta.no_captcha_required),
        meta.access.weight(),
        flag(meta.consistent_format),
        flag(meta.strictly_tabular),
    ];
    factors.iter().sum::<f64>() / factors.len() as f64
}

pub fn score(meta: &MetadataFlags) -> DisclosureScore {
    let completeness_score = completeness_score(meta);
    let easiness_score = easiness_score(meta);

    DisclosureScore {
        completeness_score,
        easiness_score,
        score: (completeness_score + easiness_score) / 2.0,
    }
}
