mod terminal;

use std::fmt;

use secrecy::ExposeSecret;
use tracing::info;
use tracing_subscriber::EnvFilter;

use learn_core::model::{ChallengeId, SessionId};
use services::{ApiConfig, AppServices, Clock, Credentials, HttpPracticeApi, RunnerConfig};

use terminal::TerminalShell;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    InvalidTime { raw: String },
    MissingFlag { command: &'static str, flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::InvalidTime { raw } => write!(f, "invalid --time value: {raw}"),
            ArgsError::MissingFlag { command, flag } => write!(f, "{command} requires {flag}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app interview  (--topic <topic> | --session <id>) [--time <secs>] [--api <url>]");
    eprintln!("  app assessment (--topic <topic> | --session <id>) [--api <url>]");
    eprintln!("  app flashcards --roadmap <id> [--api <url>]");
    eprintln!("  app challenges [--api <url>]");
    eprintln!("  app roadmaps [--api <url>]");
    eprintln!("  app profile [--api <url>]");
    eprintln!("  app hint --challenge <id> [--code <source>] [--api <url>]");
    eprintln!("  app login --email <email> --password <password> [--api <url>]");
    eprintln!();
    eprintln!("Every command also takes --token <bearer>.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARN_API_BASE_URL, LEARN_API_TOKEN, LEARN_INTERVIEW_SECS, RUST_LOG");
}

/// Which session a runner should open.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// Create a fresh session for this topic first.
    Topic(String),
    Session(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Interview(Target),
    Assessment(Target),
    Flashcards { roadmap: String },
    Challenges,
    Roadmaps,
    Profile,
    Hint { challenge: String, code: String },
    Login { email: String, password: String },
}

struct Args {
    command: Command,
    api: ApiConfig,
    credentials: Credentials,
    runner: RunnerConfig,
}

#[derive(Default)]
struct Flags {
    topic: Option<String>,
    session: Option<String>,
    roadmap: Option<String>,
    challenge: Option<String>,
    code: Option<String>,
    email: Option<String>,
    password: Option<String>,
    api: Option<String>,
    token: Option<String>,
    time: Option<String>,
}

impl Flags {
    /// `None` when `--help` was asked for.
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut flags = Self::default();
        while let Some(arg) = args.next() {
            let (slot, flag) = match arg.as_str() {
                "--topic" => (&mut flags.topic, "--topic"),
                "--session" => (&mut flags.session, "--session"),
                "--roadmap" => (&mut flags.roadmap, "--roadmap"),
                "--challenge" => (&mut flags.challenge, "--challenge"),
                "--code" => (&mut flags.code, "--code"),
                "--email" => (&mut flags.email, "--email"),
                "--password" => (&mut flags.password, "--password"),
                "--api" => (&mut flags.api, "--api"),
                "--token" => (&mut flags.token, "--token"),
                "--time" => (&mut flags.time, "--time"),
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            };
            *slot = Some(require_value(args, flag)?);
        }
        Ok(Some(flags))
    }

    fn target(&mut self, command: &'static str) -> Result<Target, ArgsError> {
        match (self.session.take(), self.topic.take()) {
            (Some(session), _) => Ok(Target::Session(session)),
            (None, Some(topic)) => Ok(Target::Topic(topic)),
            (None, None) => Err(ArgsError::MissingFlag {
                command,
                flag: "--topic or --session",
            }),
        }
    }
}

fn required(
    value: Option<String>,
    command: &'static str,
    flag: &'static str,
) -> Result<String, ArgsError> {
    value.ok_or(ArgsError::MissingFlag { command, flag })
}

impl Args {
    fn parse(mut argv: impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let Some(name) = argv.next() else {
            return Ok(None);
        };
        if matches!(name.as_str(), "--help" | "-h") {
            return Ok(None);
        }
        let Some(mut flags) = Flags::parse(&mut argv)? else {
            return Ok(None);
        };
        let command = match name.as_str() {
            "interview" => Command::Interview(flags.target("interview")?),
            "assessment" => Command::Assessment(flags.target("assessment")?),
            "flashcards" => Command::Flashcards {
                roadmap: required(flags.roadmap.take(), "flashcards", "--roadmap")?,
            },
            "challenges" => Command::Challenges,
            "roadmaps" => Command::Roadmaps,
            "profile" => Command::Profile,
            "hint" => Command::Hint {
                challenge: required(flags.challenge.take(), "hint", "--challenge")?,
                code: flags.code.take().unwrap_or_default(),
            },
            "login" => Command::Login {
                email: required(flags.email.take(), "login", "--email")?,
                password: required(flags.password.take(), "login", "--password")?,
            },
            _ => return Err(ArgsError::UnknownCommand(name)),
        };
        let api = flags.api.map_or_else(ApiConfig::from_env, ApiConfig::new);
        let credentials = flags
            .token
            .map_or_else(Credentials::from_env, Credentials::bearer);
        let mut runner = RunnerConfig::from_env();
        if let Some(raw) = flags.time {
            let secs = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ArgsError::InvalidTime { raw: raw.clone() })?;
            runner = runner.with_interview_budget(secs);
        }
        Ok(Some(Self {
            command,
            api,
            credentials,
            runner,
        }))
    }
}

fn init_tracing() {
    // Respect `RUST_LOG` if set; logs share stderr with notices.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let Some(args) = parsed else {
        print_usage();
        return Ok(());
    };

    if let Command::Login { email, password } = &args.command {
        let credentials = HttpPracticeApi::login(&args.api, email, password).await?;
        if let Some(token) = credentials.token() {
            println!("export LEARN_API_TOKEN={}", token.expose_secret());
        }
        return Ok(());
    }

    if !args.credentials.is_authenticated() {
        info!("no bearer token; requests are anonymous");
    }
    let (shell, routes) = TerminalShell::new();
    let services = AppServices::over_http(
        args.api,
        args.credentials,
        args.runner,
        shell,
        Clock::system(),
    );

    match args.command {
        Command::Interview(target) => {
            let id = match target {
                Target::Session(raw) => SessionId::parse(&raw)?,
                Target::Topic(topic) => services.starter().start_interview(&topic).await?,
            };
            terminal::run_interview(services.interview(), id, routes).await?;
        }
        Command::Assessment(target) => {
            let id = match target {
                Target::Session(raw) => SessionId::parse(&raw)?,
                Target::Topic(topic) => services.starter().start_assessment(&topic).await?,
            };
            terminal::run_assessment(services.assessment(), id, routes).await?;
        }
        Command::Flashcards { roadmap } => {
            terminal::run_flashcards(services.flashcards(), &roadmap, routes).await?;
        }
        Command::Challenges => {
            for challenge in services.challenges().list().await? {
                println!(
                    "{}  [{} / {}]  {}",
                    challenge.id, challenge.difficulty, challenge.category, challenge.title
                );
            }
        }
        Command::Roadmaps => {
            for roadmap in services.profile().ongoing_roadmaps().await? {
                println!(
                    "{}  {}  ({}%, {} topics)",
                    roadmap.id, roadmap.title, roadmap.progress, roadmap.topic_count
                );
            }
        }
        Command::Profile => {
            let profile = services.profile().load().await?;
            terminal::render_profile(&profile);
        }
        Command::Hint { challenge, code } => {
            let challenge = ChallengeId::parse(&challenge)?;
            services
                .challenges()
                .request_hint(&challenge, &code.replace("\\n", "\n"))
                .await?;
        }
        Command::Login { .. } => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>, ArgsError> {
        Args::parse(args.iter().map(|arg| (*arg).to_string()))
    }

    #[test]
    fn session_wins_over_topic() {
        let args = parse(&["interview", "--topic", "Rust", "--session", "abc"])
            .unwrap()
            .unwrap();
        assert_eq!(
            args.command,
            Command::Interview(Target::Session("abc".into()))
        );
    }

    #[test]
    fn api_flag_overrides_base_url() {
        let args = parse(&["challenges", "--api", "http://example.test"])
            .unwrap()
            .unwrap();
        assert_eq!(args.api.base_url, "http://example.test");
    }

    #[test]
    fn missing_values_are_reported() {
        assert!(matches!(
            parse(&["flashcards"]),
            Err(ArgsError::MissingFlag { flag: "--roadmap", .. })
        ));
        assert!(matches!(
            parse(&["hint", "--challenge"]),
            Err(ArgsError::MissingValue { flag: "--challenge" })
        ));
        assert!(matches!(
            parse(&["review"]),
            Err(ArgsError::UnknownCommand(_))
        ));
    }

    #[test]
    fn time_flag_sets_interview_budget() {
        let args = parse(&["interview", "--topic", "Rust", "--time", "90"])
            .unwrap()
            .unwrap();
        assert_eq!(args.runner.interview_budget_secs, 90);
        assert!(matches!(
            parse(&["interview", "--topic", "Rust", "--time", "soon"]),
            Err(ArgsError::InvalidTime { .. })
        ));
    }

    #[test]
    fn token_flag_authenticates() {
        let args = parse(&["challenges", "--token", "t0ken"]).unwrap().unwrap();
        assert!(args.credentials.is_authenticated());
    }

    #[test]
    fn no_arguments_prints_usage() {
        assert!(parse(&[]).unwrap().is_none());
    }

    #[test]
    fn help_after_a_subcommand_prints_usage() {
        assert!(parse(&["interview", "--help"]).unwrap().is_none());
        assert!(parse(&["flashcards", "-h", "--roadmap"]).unwrap().is_none());
    }

    #[test]
    fn listing_subcommands_parse() {
        let roadmaps = parse(&["roadmaps"]).unwrap().unwrap();
        assert_eq!(roadmaps.command, Command::Roadmaps);
        let profile = parse(&["profile", "--token", "t0ken"]).unwrap().unwrap();
        assert_eq!(profile.command, Command::Profile);
    }
}
