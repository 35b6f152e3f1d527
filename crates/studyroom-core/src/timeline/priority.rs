//! Subject priority labels and the classifier capability.
//!
//! The allocator only needs a [`PriorityLabel`] per subject. How the label is
//! produced is behind [`PriorityClassifier`]; the rule table here reproduces
//! the labels the trained model was fit against:
//!
//! - adjusted weight = `weight * (1 + 0.5 * major)`
//! - `>= 9` very high, `>= 7` high, `>= 5` medium, `>= 3` low, else very low

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete urgency tier, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PriorityLabel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl PriorityLabel {
    pub const ALL: [PriorityLabel; 5] = [
        Self::VeryHigh,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::VeryLow,
    ];

    /// 0 for the most urgent tier.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryHigh => "VeryHigh",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::VeryLow => "VeryLow",
        }
    }

    /// Parse a label, falling back to `Medium` for anything unrecognized.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(label = s, "unknown priority label, using Medium");
            Self::Medium
        })
    }

    /// Tier for an adjusted weight.
    pub fn from_adjusted_weight(adjusted: f64) -> Self {
        if adjusted >= 9.0 {
            Self::VeryHigh
        } else if adjusted >= 7.0 {
            Self::High
        } else if adjusted >= 5.0 {
            Self::Medium
        } else if adjusted >= 3.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Self::VeryHigh | Self::High)
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a label string that names no tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPriorityLabel(pub String);

impl fmt::Display for UnknownPriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown priority label '{}'", self.0)
    }
}

impl std::error::Error for UnknownPriorityLabel {}

impl FromStr for PriorityLabel {
    type Err = UnknownPriorityLabel;

    /// Accepts `VeryHigh`, `very_high`, `very-high`, `very high` (any case) and
    /// the Korean tier names used by the timetable app.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let folded: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();

        match folded.as_str() {
            "veryhigh" | "매우높음" => Ok(Self::VeryHigh),
            "high" | "높음" => Ok(Self::High),
            "medium" | "보통" => Ok(Self::Medium),
            "low" | "낮음" => Ok(Self::Low),
            "verylow" | "매우낮음" => Ok(Self::VeryLow),
            _ => Err(UnknownPriorityLabel(trimmed.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for PriorityLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

/// Classifier input describing one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub name: String,
    /// Importance, 1-10
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, alias = "is_major")]
    pub major: bool,
    /// Explicit label; overrides the classifier when wrapped in [`ManualOverride`]
    #[serde(default)]
    pub priority: Option<PriorityLabel>,
}

fn default_weight() -> f64 {
    1.0
}

impl SubjectProfile {
    pub fn new(name: impl Into<String>, weight: f64, major: bool) -> Self {
        Self {
            name: name.into(),
            weight,
            major,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: PriorityLabel) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Weight with the major-subject bonus applied.
    pub fn adjusted_weight(&self) -> f64 {
        let major = if self.major { 1.0 } else { 0.0 };
        self.weight * (1.0 + 0.5 * major)
    }
}

/// One classifier verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub subject: String,
    pub label: PriorityLabel,
    /// 0.0-1.0
    pub confidence: f64,
}

/// Anything that can assign priority labels to subjects.
pub trait PriorityClassifier {
    /// Return one classification per profile, in input order.
    fn classify(&self, subjects: &[SubjectProfile]) -> Vec<Classification>;
}

/// Deterministic rule-table classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightRuleClassifier;

impl PriorityClassifier for WeightRuleClassifier {
    fn classify(&self, subjects: &[SubjectProfile]) -> Vec<Classification> {
        subjects
            .iter()
            .map(|s| Classification {
                subject: s.name.clone(),
                label: PriorityLabel::from_adjusted_weight(s.adjusted_weight()),
                confidence: 1.0,
            })
            .collect()
    }
}

/// Uses a profile's explicit `priority` when present, else asks `inner`.
#[derive(Debug, Clone, Default)]
pub struct ManualOverride<C> {
    inner: C,
}

impl<C: PriorityClassifier> ManualOverride<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: PriorityClassifier> PriorityClassifier for ManualOverride<C> {
    fn classify(&self, subjects: &[SubjectProfile]) -> Vec<Classification> {
        let inferred = self.inner.classify(subjects);
        subjects
            .iter()
            .zip(inferred)
            .map(|(profile, inferred)| match profile.priority {
                Some(label) => Classification {
                    subject: profile.name.clone(),
                    label,
                    confidence: 1.0,
                },
                None => inferred,
            })
            .collect()
    }
}

/// A subject ready for allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectPriority {
    pub subject: String,
    pub weight: f64,
    pub is_major: bool,
    pub priority_label: PriorityLabel,
    pub confidence: f64,
}

impl SubjectPriority {
    pub fn new(subject: impl Into<String>, priority_label: PriorityLabel) -> Self {
        Self {
            subject: subject.into(),
            weight: 1.0,
            is_major: false,
            priority_label,
            confidence: 1.0,
        }
    }
}

/// Stable sort, most urgent first; equal tiers keep declaration order.
pub fn sort_by_priority(subjects: &mut [SubjectPriority]) {
    subjects.sort_by_key(|s| s.priority_label.rank());
}

/// Classify `profiles` and return them as allocation input, most urgent first.
pub fn prioritize<C: PriorityClassifier + ?Sized>(
    classifier: &C,
    profiles: &[SubjectProfile],
) -> Vec<SubjectPriority> {
    let mut subjects: Vec<SubjectPriority> = profiles
        .iter()
        .zip(classifier.classify(profiles))
        .map(|(profile, verdict)| SubjectPriority {
            subject: profile.name.clone(),
            weight: profile.weight,
            is_major: profile.major,
            priority_label: verdict.label,
            confidence: verdict.confidence,
        })
        .collect();
    sort_by_priority(&mut subjects);
    subjects
}
