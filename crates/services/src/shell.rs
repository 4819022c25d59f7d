//! The view shell a runner reports to: transient notices and navigation.

use std::fmt;

use learn_core::model::{RoadmapId, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Loading,
    Info,
    Success,
    Error,
}

/// Transient, non-blocking notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn loading(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Loading, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Info, message)
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Success, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Error, message)
    }

    fn with_level(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    InterviewTopics,
    AssessmentTopics,
    FlashcardTopics,
    Profile,
    Interview(SessionId),
    Assessment(SessionId),
    Flashcards(RoadmapId),
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::InterviewTopics => "/practice/interview-topics".to_string(),
            Route::AssessmentTopics => "/practice/assessment-topics".to_string(),
            Route::FlashcardTopics => "/practice/flash-cards".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Interview(id) => format!("/practice/interview/{id}"),
            Route::Assessment(id) => format!("/practice/assessment/{id}"),
            Route::Flashcards(roadmap) => format!("/practice/flash-cards/session/{roadmap}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Whatever owns the view. Calls arrive from runner tasks, so implementations
/// must be cheap and must not block.
pub trait Shell: Send + Sync {
    fn notify(&self, notice: Notice);
    fn navigate(&self, route: Route);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_render_paths() {
        let id = SessionId::parse("abc").unwrap();
        assert_eq!(Route::Interview(id.clone()).path(), "/practice/interview/abc");
        assert_eq!(Route::Assessment(id).to_string(), "/practice/assessment/abc");
        assert_eq!(Route::Profile.path(), "/profile");
        assert_eq!(
            Route::Flashcards(RoadmapId::parse("rm-1").unwrap()).path(),
            "/practice/flash-cards/session/rm-1"
        );
    }
}
