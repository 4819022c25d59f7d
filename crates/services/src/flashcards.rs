use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::seq::SliceRandom;
use rand::{Rng, rng};
use tracing::{debug, info, warn};

use learn_core::model::{Flashcard, FlashcardDeck, PageCursor, RoadmapId};

use crate::api::PracticeApi;
use crate::error::FlashcardError;
use crate::sessions::{Lifecycle, LoadPhase};
use crate::shell::{Notice, Route, Shell};

const GENERATING: &str = "Generating flashcard deck with AI...";
const GENERATED: &str = "Deck generated!";
const GENERATE_FAILED: &str = "Could not generate deck. Please try again.";
const EMPTY_DECK: &str = "Could not load flashcards.";
const SHUFFLED: &str = "Deck shuffled!";

/// Which face of the current card is up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardFace {
    #[default]
    Front,
    Back,
}

impl CardFace {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            CardFace::Front => CardFace::Back,
            CardFace::Back => CardFace::Front,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardView {
    pub phase: LoadPhase,
    pub topic: String,
    pub index: usize,
    pub total: usize,
    pub card: Option<Flashcard>,
    pub face: CardFace,
}

#[derive(Debug, Default)]
struct DeckState {
    phase: LoadPhase,
    deck: Option<FlashcardDeck>,
    cursor: PageCursor,
    face: CardFace,
}

struct Inner {
    api: Arc<dyn PracticeApi>,
    shell: Arc<dyn Shell>,
    lifecycle: Lifecycle,
    state: Mutex<DeckState>,
}

/// Browses one AI-generated deck. Decks live only as long as the session.
#[derive(Clone)]
pub struct FlashcardSession {
    inner: Arc<Inner>,
}

impl FlashcardSession {
    #[must_use]
    pub fn new(api: Arc<dyn PracticeApi>, shell: Arc<dyn Shell>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                shell,
                lifecycle: Lifecycle::new(),
                state: Mutex::new(DeckState::default()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, DeckState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generate a deck for `raw_roadmap` and show its first card.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::InvalidRoadmap` before any request, `FlashcardError::Load`
    /// or `FlashcardError::EmptyDeck` after redirecting to the topic list, and
    /// `FlashcardError::Superseded` when `stop` ran meanwhile.
    pub async fn start(&self, raw_roadmap: &str) -> Result<(), FlashcardError> {
        let liveness = self.inner.lifecycle.begin();
        *self.state() = DeckState::default();

        let roadmap = match RoadmapId::parse(raw_roadmap) {
            Ok(roadmap) => roadmap,
            Err(err) => {
                warn!(raw = raw_roadmap, "rejecting roadmap id");
                self.inner.shell.navigate(Route::FlashcardTopics);
                return Err(err.into());
            }
        };

        self.state().phase = LoadPhase::Loading;
        self.inner.shell.notify(Notice::loading(GENERATING));
        let generated = self.inner.api.generate_flashcards(&roadmap).await;
        if !liveness.is_live() {
            debug!(%roadmap, "dropping deck for a stopped session");
            return Err(FlashcardError::Superseded);
        }

        let deck = match generated {
            Ok(deck) if deck.is_empty() => {
                warn!(%roadmap, "generated deck is empty");
                return Err(self.fail(EMPTY_DECK, FlashcardError::EmptyDeck));
            }
            Ok(deck) => deck,
            Err(err) => {
                warn!(%roadmap, error = %err, "deck generation failed");
                let message = err.detail().unwrap_or(GENERATE_FAILED).to_owned();
                return Err(self.fail(&message, FlashcardError::Load(err)));
            }
        };

        info!(%roadmap, cards = deck.cards.len(), "deck generated");
        let mut state = self.state();
        state.cursor = PageCursor::new(deck.cards.len());
        state.deck = Some(deck);
        state.phase = LoadPhase::Ready;
        drop(state);
        self.inner.shell.notify(Notice::success(GENERATED));
        Ok(())
    }

    fn fail(&self, message: &str, err: FlashcardError) -> FlashcardError {
        self.state().phase = LoadPhase::Failed;
        self.inner.shell.notify(Notice::error(message));
        self.inner.shell.navigate(Route::FlashcardTopics);
        err
    }

    pub fn stop(&self) {
        self.inner.lifecycle.invalidate();
        *self.state() = DeckState::default();
    }

    /// Advance with wrap-around; the new card shows its front.
    pub fn next(&self) {
        let mut state = self.state();
        state.cursor.next_wrapping();
        state.face = CardFace::Front;
    }

    pub fn previous(&self) {
        let mut state = self.state();
        state.cursor.previous_wrapping();
        state.face = CardFace::Front;
    }

    pub fn flip(&self) -> CardFace {
        let mut state = self.state();
        state.face = state.face.flipped();
        state.face
    }

    /// Shuffle with the thread-local generator.
    pub fn shuffle(&self) {
        self.shuffle_with(&mut rng());
    }

    /// Reorder the cards and go back to the first one.
    pub fn shuffle_with<R: Rng + ?Sized>(&self, rng: &mut R) {
        {
            let mut state = self.state();
            let Some(deck) = state.deck.as_mut() else {
                return;
            };
            deck.cards.shuffle(rng);
            state.cursor.reset();
            state.face = CardFace::Front;
        }
        self.inner.shell.notify(Notice::info(SHUFFLED));
    }

    #[must_use]
    pub fn view(&self) -> FlashcardView {
        let state = self.state();
        let index = state.cursor.index();
        FlashcardView {
            phase: state.phase,
            topic: state
                .deck
                .as_ref()
                .map(|deck| deck.topic.clone())
                .unwrap_or_default(),
            index,
            total: state.cursor.len(),
            card: state
                .deck
                .as_ref()
                .and_then(|deck| deck.cards.get(index))
                .cloned(),
            face: state.face,
        }
    }
}
