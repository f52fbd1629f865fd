//! Authenticity analysis records as returned by the AI service and kept in the cache.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five fixed authenticity dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Alignment,
    BoundaryConsistency,
    ShadowIntegration,
    EthicalStringInfluence,
    SelfExpression,
}

impl Dimension {
    pub const ALL: [Self; 5] = [
        Self::Alignment,
        Self::BoundaryConsistency,
        Self::ShadowIntegration,
        Self::EthicalStringInfluence,
        Self::SelfExpression,
    ];

    /// Wire identifier, as used in `authenticity_analysis`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Alignment => "alignment",
            Self::BoundaryConsistency => "boundary_consistency",
            Self::ShadowIntegration => "shadow_integration",
            Self::EthicalStringInfluence => "ethical_string_influence",
            Self::SelfExpression => "self_expression",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Alignment => {
                "Degree to which behavior reflects reported values or personal statements."
            },
            Self::BoundaryConsistency => {
                "How clearly the figure defines and maintains personal, professional, or social boundaries."
            },
            Self::ShadowIntegration => {
                "How observable impulses (anger, ambition) manifest and whether they are integrated vs. suppressed."
            },
            Self::EthicalStringInfluence => {
                "Degree to which social, cultural, or institutional pressures dictate behavior."
            },
            Self::SelfExpression => "Clarity and coherence of communication, persona, and behavior.",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Rejected score value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreError(pub f64);

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score {} is outside [{}, {}]", self.0, Score::MIN, Score::MAX)
    }
}

impl std::error::Error for ScoreError {}

/// A finite score in `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = ScoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScoreError(value))
        }
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: Score,
    pub evidence: Vec<String>,
}

/// Exactly the five dimensions; an unknown or missing one fails to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthenticityScores {
    pub alignment: DimensionScore,
    pub boundary_consistency: DimensionScore,
    pub shadow_integration: DimensionScore,
    pub ethical_string_influence: DimensionScore,
    pub self_expression: DimensionScore,
}

impl AuthenticityScores {
    #[must_use]
    pub const fn get(&self, dimension: Dimension) -> &DimensionScore {
        match dimension {
            Dimension::Alignment => &self.alignment,
            Dimension::BoundaryConsistency => &self.boundary_consistency,
            Dimension::ShadowIntegration => &self.shadow_integration,
            Dimension::EthicalStringInfluence => &self.ethical_string_influence,
            Dimension::SelfExpression => &self.self_expression,
        }
    }

    /// Dimensions paired with their scores, in legend order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &DimensionScore)> {
        Dimension::ALL.into_iter().map(|d| (d, self.get(d)))
    }
}

/// Cached result for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Display name as returned by the AI service.
    #[serde(rename = "name")]
    pub subject_name: String,
    #[serde(rename = "authenticity_analysis")]
    pub dimension_scores: AuthenticityScores,
    #[serde(default)]
    pub narrative_summary: String,
}

impl AnalysisRecord {
    /// Cache key of this record's own subject name.
    #[must_use]
    pub fn normalized_key(&self) -> String {
        normalize_subject(&self.subject_name)
    }
}

/// Trims surrounding whitespace, then lower-cases.
///
/// `"  Jane Doe "` and `"jane doe"` map to the same key.
#[must_use]
pub fn normalize_subject(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(Score::try_from(0.0).is_ok());
        assert!(Score::try_from(10.0).is_ok());
        assert!(Score::try_from(7.5).is_ok());
        assert!(Score::try_from(-0.1).is_err());
        assert!(Score::try_from(10.01).is_err());
        assert!(Score::try_from(f64::NAN).is_err());
        assert!(Score::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_normalize_subject() {
        assert_eq!(normalize_subject("  Jane Doe "), "jane doe");
        assert_eq!(normalize_subject("\tJANE doe\n"), "jane doe");
        assert_eq!(normalize_subject("   "), "");
    }

    #[test]
    fn test_dimension_ids_match_serde() {
        for dimension in Dimension::ALL {
            let json = format!("\"{}\"", dimension.id());
            let parsed: Dimension = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, dimension);
            assert!(!dimension.description().is_empty());
        }
    }
}
