use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::model::ids::RoadmapId;
use crate::model::session::{AssessmentRecord, AssessmentSession, InterviewRecord, InterviewSession};

//
// ─── ROADMAPS ─────────────────────────────────────────────────────────────────
//

/// Learning roadmap as the server lists it. Node contents are not needed here.
#[derive(Debug, Clone, Deserialize)]
pub struct RoadmapRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    title: String,
    #[serde(default)]
    progress: u32,
    #[serde(default)]
    nodes: Vec<IgnoredAny>,
}

impl RoadmapRecord {
    /// `None` when the record carries no usable id; such roadmaps cannot produce a deck.
    #[must_use]
    pub fn into_summary(self) -> Option<RoadmapSummary> {
        let id = self
            .id
            .iter()
            .chain(self.legacy_id.iter())
            .find_map(|raw| RoadmapId::parse(raw).ok())?;
        Some(RoadmapSummary {
            id,
            title: self.title,
            progress: self.progress.min(100),
            topic_count: self.nodes.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapSummary {
    pub id: RoadmapId,
    pub title: String,
    /// Completed share of the roadmap's topics, in percent.
    pub progress: u32,
    pub topic_count: usize,
}

//
// ─── PROFILE ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserDetails {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
}

/// Profile exactly as the server sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    user_details: UserDetails,
    #[serde(default)]
    roadmaps: Vec<RoadmapRecord>,
    #[serde(default)]
    interviews: Vec<InterviewRecord>,
    #[serde(default)]
    assessments: Vec<AssessmentRecord>,
}

impl ProfileRecord {
    /// Drop entries without a usable id and produce the client snapshot.
    #[must_use]
    pub fn normalize(self) -> UserProfile {
        UserProfile {
            user: self.user_details,
            roadmaps: self
                .roadmaps
                .into_iter()
                .filter_map(RoadmapRecord::into_summary)
                .collect(),
            interviews: self
                .interviews
                .into_iter()
                .filter_map(InterviewRecord::into_listed)
                .collect(),
            assessments: self
                .assessments
                .into_iter()
                .filter_map(AssessmentRecord::into_listed)
                .collect(),
        }
    }
}

/// Where finished sessions end up: the user's roadmaps plus graded interviews
/// and assessments.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user: UserDetails,
    pub roadmaps: Vec<RoadmapSummary>,
    pub interviews: Vec<InterviewSession>,
    pub assessments: Vec<AssessmentSession>,
}

impl UserProfile {
    /// Mean roadmap progress in percent, `0` without roadmaps.
    #[must_use]
    pub fn average_progress(&self) -> u32 {
        let count = u32::try_from(self.roadmaps.len()).unwrap_or(u32::MAX);
        if count == 0 {
            return 0;
        }
        let total: u32 = self.roadmaps.iter().map(|roadmap| roadmap.progress).sum();
        (total + count / 2) / count
    }
}
