//! Sequence features relocated through mappings

use std::fmt;

/// An annotated interval on a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceFeature {
    pub feature_type: String,
    pub description: String,
    /// First position (1-based, inclusive)
    pub begin: i64,
    /// Last position (1-based, inclusive); below `begin` on the reverse strand
    pub end: i64,
    pub score: Option<f32>,
    pub feature_group: Option<String>,
}

impl SequenceFeature {
    pub fn new(
        feature_type: impl Into<String>,
        description: impl Into<String>,
        begin: i64,
        end: i64,
    ) -> Self {
        Self {
            feature_type: feature_type.into(),
            description: description.into(),
            begin,
            end,
            score: None,
            feature_group: None,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.feature_group = Some(group.into());
        self
    }

    /// Copy of this feature placed at a new interval
    pub fn relocated(&self, begin: i64, end: i64) -> Self {
        Self {
            begin,
            end,
            ..self.clone()
        }
    }
}

impl fmt::Display for SequenceFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.feature_type, self.begin, self.end)?;
        if let Some(group) = &self.feature_group {
            write!(f, " ({})", group)?;
        }
        Ok(())
    }
}
