use serde::Deserialize;

use crate::model::ids::ChallengeId;

/// Code challenge as listed by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    category: String,
    #[serde(default, rename = "template_code")]
    starter_code: String,
}

impl ChallengeRecord {
    /// `None` when the record carries no usable id; such challenges cannot ask for hints.
    #[must_use]
    pub fn into_challenge(self) -> Option<CodeChallenge> {
        let id = self
            .id
            .iter()
            .chain(self.legacy_id.iter())
            .find_map(|raw| ChallengeId::parse(raw).ok())?;
        Some(CodeChallenge {
            id,
            title: self.title,
            description: self.description,
            difficulty: self.difficulty,
            category: self.category,
            starter_code: self.starter_code,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChallenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub starter_code: String,
}
