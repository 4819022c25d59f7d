mod answers;
mod challenge;
mod cursor;
mod flashcard;
mod ids;
mod profile;
mod question;
mod session;
mod stage;
mod submission;
mod timestamp;

pub use answers::AnswerStore;
pub use challenge::{ChallengeRecord, CodeChallenge};
pub use cursor::PageCursor;
pub use flashcard::{Flashcard, FlashcardDeck, FlashcardKind};
pub use ids::{ChallengeId, RoadmapId, SessionId};
pub use profile::{ProfileRecord, RoadmapRecord, RoadmapSummary, UserDetails, UserProfile};
pub use question::{AssessmentQuestion, InterviewQuestion, ProjectTask, QuestionKind};
pub use session::{
    AssessmentRecord, AssessmentSession, InterviewRecord, InterviewSession, SessionStatus,
    StartedSession,
};
pub use stage::{NextAction, Stage, StageController};
pub use submission::{AnswerEntry, AssessmentSubmission, InterviewSubmission};
pub use timestamp::parse_timestamp;
