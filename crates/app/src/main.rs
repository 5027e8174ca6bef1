use std::fmt;

use dsa_core::model::{CheatSheet, ContentKind, McqOption, Topic, UserId};
use services::{AppServices, Clock, ProgressState, TopicCard, TopicContent};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingTopic,
    UnknownArg(String),
    InvalidTopic { raw: String },
    InvalidUser { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingTopic => write!(f, "topic requires a topic name"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTopic { raw } => write!(f, "unknown topic: {raw}"),
            ArgsError::InvalidUser { raw } => write!(f, "invalid --user value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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
    eprintln!("  cargo run -p app -- dashboard      [--db <sqlite_url>] [--user <uuid>] [--json]");
    eprintln!("  cargo run -p app -- topic <name>   [--db <sqlite_url>] [--user <uuid>] [--json]");
    eprintln!();
    eprintln!("Topics:");
    let names: Vec<&str> = Topic::ALL.iter().map(|t| t.as_str()).collect();
    eprintln!("  {}", names.join(", "));
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://dev.sqlite3");
    eprintln!("  no --user: every percentage is 0");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DSA_DB_URL, DSA_USER_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Dashboard,
    Topic(Topic),
}

#[derive(Debug)]
struct Args {
    command: Command,
    db_url: String,
    user: Option<UserId>,
    json: bool,
}

fn parse_user(raw: String) -> Result<UserId, ArgsError> {
    raw.trim()
        .parse::<UserId>()
        .map_err(|_| ArgsError::InvalidUser { raw })
}

/// Fallbacks taken from `DSA_DB_URL` and `DSA_USER_ID` when no flag is given.
#[derive(Debug, Default)]
struct EnvDefaults {
    db_url: Option<String>,
    user: Option<String>,
}

impl EnvDefaults {
    fn from_env() -> Self {
        Self {
            db_url: std::env::var("DSA_DB_URL").ok(),
            user: std::env::var("DSA_USER_ID").ok(),
        }
    }
}

impl Args {
    fn parse(argv: Vec<String>, env: EnvDefaults) -> Result<Self, ArgsError> {
        let mut db_url = env
            .db_url
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);
        let mut user = None;
        let mut json = false;

        let mut args = argv.into_iter();
        let command = match args.next().as_deref() {
            None | Some("dashboard") => Command::Dashboard,
            Some("topic") => {
                let raw = args.next().ok_or(ArgsError::MissingTopic)?;
                let topic = raw
                    .parse::<Topic>()
                    .map_err(|_| ArgsError::InvalidTopic { raw: raw.clone() })?;
                Command::Topic(topic)
            }
            Some("--help" | "-h") => {
                print_usage();
                std::process::exit(0);
            }
            Some(other) => return Err(ArgsError::UnknownArg(other.to_string())),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user" => {
                    user = Some(parse_user(require_value(&mut args, "--user")?)?);
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        // A bad env user only matters when `--user` did not replace it.
        if user.is_none() {
            user = env
                .user
                .filter(|v| !v.trim().is_empty())
                .map(parse_user)
                .transpose()?;
        }

        Ok(Self {
            command,
            db_url,
            user,
            json,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// `RUST_LOG` wins when set and valid; otherwise everything logs at `info`.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_tracing() {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn state_label(state: &ProgressState) -> &'static str {
    match state {
        ProgressState::Loading => "loading",
        ProgressState::Ready { .. } => "ok",
        ProgressState::Unavailable { .. } => "unavailable",
    }
}

fn print_dashboard(cards: &[TopicCard]) {
    for card in cards {
        println!(
            "{:<24} {:>3}%  {}{}",
            card.title,
            card.progress,
            card.description,
            if card.state.is_unavailable() {
                "  (progress unavailable)"
            } else {
                ""
            }
        );
    }
}

fn print_topic(state: &ProgressState, content: &TopicContent, sheets: &[CheatSheet]) {
    let topic = content.topic;
    let progress = state.progress();
    println!("{} - {}", topic.title(), topic.description());
    let categories: Vec<String> = ContentKind::ALL
        .iter()
        .map(|kind| format!("{kind} {}%", progress.category(*kind)))
        .collect();
    println!(
        "progress [{}]: {}, overall {}%",
        state_label(state),
        categories.join(", "),
        progress.overall
    );

    println!();
    println!("Videos ({}):", content.videos.len());
    for video in &content.videos {
        println!("  [{}] {} ({})", video.id, video.title, video.embed_url());
    }

    println!("MCQs ({}):", content.mcqs.len());
    for mcq in &content.mcqs {
        println!("  [{}] {}", mcq.id, mcq.question);
        for option in McqOption::ALL {
            println!("      {option}) {}", mcq.option_text(option));
        }
    }

    println!("Coding problems ({}):", content.problems.len());
    for problem in &content.problems {
        println!(
            "  [{}] {} on {} [{}] {}",
            problem.id,
            problem.title,
            problem.platform,
            problem.difficulty,
            problem.problem_url
        );
    }

    println!("Cheat sheets ({}):", sheets.len());
    for sheet in sheets {
        println!("  {}", sheet.title);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = Args::parse(argv, EnvDefaults::from_env()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    prepare_sqlite_file(&args.db_url)?;
    let app = AppServices::new_sqlite(&args.db_url, Clock::system()).await?;
    info!(db = %args.db_url, signed_in = args.user.is_some(), "storage ready");

    match args.command {
        Command::Dashboard => {
            let cards = app.dashboard().topic_cards(args.user).await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&cards)?);
            } else {
                print_dashboard(&cards);
            }
        }
        Command::Topic(topic) => {
            let content_svc = app.topic_content();
            let (state, content, sheets) = tokio::join!(
                app.aggregator().compute_progress(topic, args.user),
                content_svc.topic_content(topic),
                content_svc.cheat_sheets(topic),
            );
            let content = content?;
            let sheets = sheets?;
            if args.json {
                let out = serde_json::json!({
                    "topic": topic,
                    "title": topic.title(),
                    "progress": state,
                    "content": content,
                    "cheat_sheets": sheets,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_topic(&state, &content, &sheets);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
