//! Line-oriented shell: prints notices, follows navigation, reads commands from stdin.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::debug;

use learn_core::model::{NextAction, RoadmapId, SessionId, Stage, UserProfile};
use services::{
    AssessmentRunner, AssessmentView, CardFace, FlashcardSession, FlashcardView, InterviewRunner,
    InterviewView, Notice, NoticeLevel, Route, RunnerError, Shell,
};

/// `Shell` that prints to the terminal and forwards navigation to the input loop.
pub struct TerminalShell {
    routes: mpsc::UnboundedSender<Route>,
}

impl TerminalShell {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Route>) {
        let (routes, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { routes }), receiver)
    }
}

impl Shell for TerminalShell {
    fn notify(&self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Loading => "...",
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{tag}] {}", notice.message);
    }

    fn navigate(&self, route: Route) {
        eprintln!("-> {route}");
        if self.routes.send(route).is_err() {
            debug!("navigation after the input loop ended");
        }
    }
}

enum Input {
    Command(Command),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Next,
    Prev,
    Submit,
    Project,
    Flip,
    Shuffle,
    Show,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let command = match line.trim() {
        ":next" | ":n" => Command::Next,
        ":prev" | ":p" => Command::Prev,
        ":submit" => Command::Submit,
        ":project" => Command::Project,
        ":flip" | ":f" => Command::Flip,
        ":shuffle" => Command::Shuffle,
        ":show" => Command::Show,
        ":quit" | ":q" => Command::Quit,
        other if other.starts_with(':') => {
            eprintln!("unknown command: {other}");
            return None;
        }
        _ => return Some(Input::Text(line.replace("\\n", "\n"))),
    };
    Some(Input::Command(command))
}

/// What woke the input loop.
enum Event {
    Line(String),
    Left(Route),
    Closed,
}

struct Session {
    lines: Lines<BufReader<Stdin>>,
    routes: mpsc::UnboundedReceiver<Route>,
}

impl Session {
    fn new(routes: mpsc::UnboundedReceiver<Route>) -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            routes,
        }
    }

    /// Next stdin line, or the first navigation away from `here`.
    async fn next_event(&mut self, here: &Route) -> Event {
        loop {
            tokio::select! {
                line = self.lines.next_line() => {
                    return match line {
                        Ok(Some(line)) => Event::Line(line),
                        Ok(None) | Err(_) => Event::Closed,
                    };
                }
                route = self.routes.recv() => match route {
                    Some(route) if &route == here => continue,
                    Some(route) => return Event::Left(route),
                    None => return Event::Closed,
                },
            }
        }
    }
}

fn report(result: Result<(), RunnerError>) {
    if let Err(err) = result {
        debug!(error = %err, "command rejected");
        // Submission failures already arrived as notices.
        if !matches!(err, RunnerError::Submit(_)) {
            eprintln!("{err}");
        }
    }
}

// ─── INTERVIEW ─────────────────────────────────────────────────────────────────

pub async fn run_interview(
    runner: InterviewRunner,
    id: SessionId,
    routes: mpsc::UnboundedReceiver<Route>,
) -> Result<(), RunnerError> {
    let mut session = Session::new(routes);
    runner.start(id.as_str()).await?;
    let here = Route::Interview(id);
    render_interview(&runner.view());

    loop {
        let line = match session.next_event(&here).await {
            Event::Line(line) => line,
            Event::Left(_) | Event::Closed => break,
        };
        match parse_input(&line) {
            Some(Input::Command(Command::Next)) => {
                runner.next();
            }
            Some(Input::Command(Command::Prev)) => {
                runner.previous();
            }
            Some(Input::Command(Command::Submit)) => report(runner.submit().await),
            Some(Input::Command(Command::Quit)) => break,
            Some(Input::Command(Command::Show)) => {}
            Some(Input::Command(_)) | None => continue,
            Some(Input::Text(text)) => report(runner.set_current_answer(text)),
        }
        render_interview(&runner.view());
    }

    runner.stop();
    Ok(())
}

fn render_interview(view: &InterviewView) {
    println!();
    println!(
        "{} | question {}/{} | {}{}",
        view.topic,
        view.index + 1,
        view.total,
        view.timer_label,
        if view.timer_urgent { " !" } else { "" }
    );
    if let Some(question) = &view.question {
        println!("{}", question.prompt);
    }
    if !view.answer.is_empty() {
        let coding = view.question.as_ref().is_some_and(|question| question.kind.is_coding());
        println!("{}", if coding { "--- code ---" } else { "--- answer ---" });
        println!("{}", view.answer);
    }
    match view.next_action {
        Some(NextAction::Next) => println!("(:next, :prev, :submit, :quit)"),
        Some(NextAction::Submit) => println!("(:submit, :prev, :quit)"),
        None => println!("(session completed, :quit)"),
    }
}

// ─── ASSESSMENT ────────────────────────────────────────────────────────────────

pub async fn run_assessment(
    runner: AssessmentRunner,
    id: SessionId,
    routes: mpsc::UnboundedReceiver<Route>,
) -> Result<(), RunnerError> {
    let mut session = Session::new(routes);
    runner.start(id.as_str()).await?;
    let here = Route::Assessment(id);
    let mut focus = 0usize;
    render_assessment(&runner.view(), focus);

    loop {
        let line = match session.next_event(&here).await {
            Event::Line(line) => line,
            Event::Left(_) | Event::Closed => break,
        };
        let stage = runner.stage();
        let questions = runner.view().knowledge.len();
        match (parse_input(&line), stage) {
            (Some(Input::Command(Command::Next)), Stage::Knowledge) => {
                focus = (focus + 1).min(questions.saturating_sub(1));
            }
            (Some(Input::Command(Command::Prev)), Stage::Knowledge) => {
                focus = focus.saturating_sub(1);
            }
            (Some(Input::Command(Command::Next)), _) => {
                runner.next_task();
            }
            (Some(Input::Command(Command::Prev)), _) => {
                runner.previous_task();
            }
            (Some(Input::Command(Command::Project)), _) => report(runner.advance_to_project()),
            (Some(Input::Command(Command::Submit)), _) => report(runner.submit().await),
            (Some(Input::Command(Command::Quit)), _) => break,
            (Some(Input::Command(Command::Show)), _) => {}
            (Some(Input::Command(_)) | None, _) => continue,
            (Some(Input::Text(text)), Stage::Knowledge) => {
                report(runner.set_knowledge_answer(focus, text));
            }
            (Some(Input::Text(text)), _) => report(runner.set_current_code(text)),
        }
        render_assessment(&runner.view(), focus);
    }

    runner.stop();
    Ok(())
}

fn render_assessment(view: &AssessmentView, focus: usize) {
    println!();
    let timer = view
        .remaining_secs
        .map(|secs| format!(" | {}", learn_core::time::format_mm_ss(secs)))
        .unwrap_or_default();
    println!("{} | {} stage{timer}", view.topic, view.stage);
    match view.stage {
        Stage::Knowledge => {
            for (index, (question, answer)) in view.knowledge.iter().enumerate() {
                let marker = if index == focus { ">" } else { " " };
                println!("{marker} {}. {}", index + 1, question.prompt);
                for option in question.options.iter().flatten() {
                    println!("     - {option}");
                }
                if !answer.is_empty() {
                    println!("     = {answer}");
                }
            }
            println!("(:next/:prev pick a question, text answers it, :project continues)");
        }
        Stage::Project => {
            println!("task {}/{}", view.task_index + 1, view.task_count);
            if let Some(task) = &view.task {
                println!("{}", task.description);
            }
            println!("--- code ---");
            println!("{}", view.code);
            match view.next_action {
                Some(NextAction::Submit) => println!("(:submit, :prev, :quit)"),
                _ => println!("(:next, :prev, :quit)"),
            }
        }
        Stage::Completed => println!("(assessment completed, :quit)"),
    }
}

// ─── FLASHCARDS ────────────────────────────────────────────────────────────────

pub async fn run_flashcards(
    deck: FlashcardSession,
    roadmap: &str,
    routes: mpsc::UnboundedReceiver<Route>,
) -> Result<(), services::FlashcardError> {
    let mut session = Session::new(routes);
    deck.start(roadmap).await?;
    render_card(&deck.view());

    let here = Route::Flashcards(RoadmapId::parse(roadmap)?);
    loop {
        let line = match session.next_event(&here).await {
            Event::Line(line) => line,
            Event::Left(_) | Event::Closed => break,
        };
        match parse_input(&line) {
            Some(Input::Command(Command::Next)) => deck.next(),
            Some(Input::Command(Command::Prev)) => deck.previous(),
            Some(Input::Command(Command::Flip)) => {
                deck.flip();
            }
            Some(Input::Command(Command::Shuffle)) => deck.shuffle(),
            Some(Input::Command(Command::Quit)) => break,
            Some(Input::Command(Command::Show)) => {}
            _ => continue,
        }
        render_card(&deck.view());
    }

    deck.stop();
    Ok(())
}

fn render_card(view: &FlashcardView) {
    let Some(card) = &view.card else {
        return;
    };
    println!();
    println!("{} | card {}/{}", view.topic, view.index + 1, view.total);
    match view.face {
        CardFace::Front => println!("{}", card.front),
        CardFace::Back => println!("{}", card.back),
    }
    println!("(:flip, :next, :prev, :shuffle, :quit)");
}

// ─── PROFILE ───────────────────────────────────────────────────────────────────

pub fn render_profile(profile: &UserProfile) {
    println!("{} <{}>", profile.user.username, profile.user.email);
    println!(
        "{} roadmaps, {}% average progress",
        profile.roadmaps.len(),
        profile.average_progress()
    );

    println!();
    println!("interviews:");
    for interview in &profile.interviews {
        let score = interview
            .score()
            .map_or_else(|| "pending".to_string(), |score| score.to_string());
        println!("  {}  {}  score {score}", interview.id(), interview.topic());
        if let Some(feedback) = interview.feedback() {
            println!("    {feedback}");
        }
    }

    println!();
    println!("assessments:");
    for assessment in &profile.assessments {
        println!("  {}  {}", assessment.id(), assessment.topic());
        if let Some(report) = assessment.final_report() {
            println!("    {report}");
        }
        for (skill, level) in assessment.competency_map() {
            println!("    {skill}: {level:.2}");
        }
    }
}
