#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod challenges;
pub mod config;
pub mod error;
pub mod flashcards;
pub mod profile;
pub mod sessions;
pub mod shell;

pub use learn_core::Clock;

pub use api::{HttpPracticeApi, PracticeApi};
pub use app_services::AppServices;
pub use challenges::ChallengeService;
pub use config::{ApiConfig, Credentials, RunnerConfig};
pub use error::{ApiError, FlashcardError, HintError, RunnerError, StartError, SubmitError};
pub use flashcards::{CardFace, FlashcardSession, FlashcardView};
pub use profile::ProfileService;
pub use sessions::{
    AssessmentRunner, AssessmentView, InterviewRunner, InterviewView, LoadPhase, SessionStarter,
    Trigger,
};
pub use shell::{Notice, NoticeLevel, Route, Shell};
