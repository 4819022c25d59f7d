use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashcardKind {
    Keyword,
    Cloze,
    QuestionAnswer,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Flashcard {
    #[serde(default, rename = "card_type")]
    pub kind: Option<FlashcardKind>,
    pub front: String,
    pub back: String,
}

/// AI-generated deck for one roadmap. Decks are not persisted anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlashcardDeck {
    pub topic: String,
    #[serde(default)]
    pub cards: Vec<Flashcard>,
}

impl FlashcardDeck {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
