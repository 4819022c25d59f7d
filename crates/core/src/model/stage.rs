use std::fmt;

use crate::error::StageError;
use crate::model::cursor::PageCursor;

/// Phase of a two-part assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Knowledge,
    Project,
    Completed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Knowledge => "knowledge",
            Stage::Project => "project",
            Stage::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// What the forward button does on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    Next,
    Submit,
}

/// Forward-only stage machine with a task cursor inside the project stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageController {
    stage: Stage,
    tasks: PageCursor,
}

impl StageController {
    #[must_use]
    pub fn new(task_count: usize) -> Self {
        Self {
            stage: Stage::Knowledge,
            tasks: PageCursor::new(task_count),
        }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn task_index(&self) -> usize {
        self.tasks.index()
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Leave the knowledge questions. Unanswered questions are allowed.
    ///
    /// # Errors
    ///
    /// Returns `StageError::InvalidTransition` outside the knowledge stage.
    pub fn advance_to_project(&mut self) -> Result<(), StageError> {
        if self.stage != Stage::Knowledge {
            return Err(StageError::InvalidTransition {
                from: self.stage,
                to: Stage::Project,
            });
        }
        self.stage = Stage::Project;
        Ok(())
    }

    /// Returns whether the cursor moved. Outside the project stage this is a no-op.
    pub fn previous_task(&mut self) -> bool {
        self.stage == Stage::Project && self.tasks.previous()
    }

    /// Returns whether the cursor moved. At the last task, `Submit` replaces `Next`.
    pub fn next_task(&mut self) -> bool {
        self.stage == Stage::Project && self.tasks.next()
    }

    /// Forward action on the current page, `None` once completed.
    #[must_use]
    pub fn next_action(&self) -> Option<NextAction> {
        match self.stage {
            Stage::Knowledge => Some(NextAction::Next),
            Stage::Project if self.tasks.is_last() => Some(NextAction::Submit),
            Stage::Project => Some(NextAction::Next),
            Stage::Completed => None,
        }
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.next_action() == Some(NextAction::Submit)
    }

    /// Terminal transition, taken only after the submission was accepted.
    ///
    /// # Errors
    ///
    /// Returns `StageError::InvalidTransition` if already completed.
    pub fn mark_completed(&mut self) -> Result<(), StageError> {
        if self.stage == Stage::Completed {
            return Err(StageError::InvalidTransition {
                from: Stage::Completed,
                to: Stage::Completed,
            });
        }
        self.stage = Stage::Completed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_knowledge_stage() {
        let stages = StageController::new(2);
        assert_eq!(stages.stage(), Stage::Knowledge);
        assert_eq!(stages.next_action(), Some(NextAction::Next));
        assert!(!stages.can_submit());
    }

    #[test]
    fn task_paging_only_works_in_project_stage() {
        let mut stages = StageController::new(3);
        assert!(!stages.next_task());

        stages.advance_to_project().unwrap();
        assert!(!stages.previous_task());
        assert_eq!(stages.task_index(), 0);

        assert!(stages.next_task());
        assert!(stages.next_task());
        assert_eq!(stages.next_action(), Some(NextAction::Submit));
        assert!(!stages.next_task());
        assert_eq!(stages.task_index(), 2);

        assert!(stages.previous_task());
        assert_eq!(stages.next_action(), Some(NextAction::Next));
    }

    #[test]
    fn single_task_offers_submit_immediately() {
        let mut stages = StageController::new(1);
        stages.advance_to_project().unwrap();
        assert!(stages.can_submit());
    }

    #[test]
    fn stages_only_move_forward() {
        let mut stages = StageController::new(1);
        stages.advance_to_project().unwrap();
        let err = stages.advance_to_project().unwrap_err();
        assert_eq!(
            err,
            StageError::InvalidTransition {
                from: Stage::Project,
                to: Stage::Project
            }
        );

        stages.mark_completed().unwrap();
        assert_eq!(stages.next_action(), None);
        assert!(stages.mark_completed().is_err());
        assert!(stages.advance_to_project().is_err());
    }
}
