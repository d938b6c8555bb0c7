use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult, NonEmptyString};

/// Number of evidence entries every action and ban request must carry.
pub const EVIDENCE_COUNT: usize = 3;

/// Exactly three non-empty supporting links.
///
/// URL syntax is not checked; staff input is trusted beyond emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Evidence([NonEmptyString; EVIDENCE_COUNT]);

impl Evidence {
    /// Validates an evidence list.
    pub fn new<I, S>(links: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let links: Vec<String> = links.into_iter().map(Into::into).collect();
        validate_evidence(&links)
    }

    /// Returns the three links in submission order.
    #[must_use]
    pub fn links(&self) -> [&str; EVIDENCE_COUNT] {
        [self.0[0].as_str(), self.0[1].as_str(), self.0[2].as_str()]
    }
}

impl TryFrom<Vec<String>> for Evidence {
    type Error = AppError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        validate_evidence(&value)
    }
}

impl From<Evidence> for Vec<String> {
    fn from(value: Evidence) -> Self {
        value.0.into_iter().map(String::from).collect()
    }
}

/// Checks that `links` holds exactly three entries that are non-empty once
/// trimmed, returning the trimmed evidence.
pub fn validate_evidence(links: &[String]) -> AppResult<Evidence> {
    if links.len() != EVIDENCE_COUNT {
        return Err(AppError::InvalidEvidence(format!(
            "exactly {EVIDENCE_COUNT} evidence links are required, got {}",
            links.len()
        )));
    }

    let mut validated = Vec::with_capacity(EVIDENCE_COUNT);
    for (position, link) in links.iter().enumerate() {
        let value = NonEmptyString::new(link.as_str()).map_err(|_| {
            AppError::InvalidEvidence(format!("evidence link {} is empty", position + 1))
        })?;
        validated.push(value);
    }

    let links: [NonEmptyString; EVIDENCE_COUNT] = validated.try_into().map_err(|_| {
        AppError::Internal("evidence length changed during validation".to_owned())
    })?;

    Ok(Evidence(links))
}
