use std::fmt;

use chrono::{DateTime, Duration, Utc};
use dsa_core::model::{ContentError, Difficulty, McqOption, Platform, Topic, validate_listing};
use storage::repository::{
    NewCheatSheetRecord, NewMcqRecord, NewProblemRecord, NewVideoRecord, Storage,
};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    topics: Vec<Topic>,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTopic { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTopic { raw } => write!(f, "invalid --topic value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("DSA_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut topics = Vec::new();
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--topic" => {
                    let value = require_value(&mut args, "--topic")?;
                    let topic = value
                        .parse::<Topic>()
                        .map_err(|_| ArgsError::InvalidTopic { raw: value.clone() })?;
                    topics.push(topic);
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if topics.is_empty() {
            topics = Topic::ALL.to_vec();
        }

        Ok(Self {
            db_url,
            topics,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --topic <name>            Seed only this topic (repeatable; default: all)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  DSA_DB_URL");
}

struct SampleMcq {
    question: &'static str,
    options: [&'static str; 4],
    correct: McqOption,
    explanation: &'static str,
}

struct Sample {
    video: (&'static str, &'static str),
    mcqs: &'static [SampleMcq],
    problem: (&'static str, &'static str, Platform, &'static [&'static str]),
    cheat_sheet: (&'static str, &'static str),
}

#[allow(clippy::too_many_lines)]
fn sample_for(topic: Topic) -> Sample {
    match topic {
        Topic::Strings => Sample {
            video: ("String basics", "https://www.youtube.com/watch?v=7m1DMYAbdiY"),
            mcqs: &[
                SampleMcq {
                    question: "What is the time complexity of comparing two strings of length n?",
                    options: ["O(1)", "O(log n)", "O(n)", "O(n^2)"],
                    correct: McqOption::C,
                    explanation: "Every character may need to be compared.",
                },
                SampleMcq {
                    question: "Which algorithm finds a pattern in linear time?",
                    options: ["Bubble sort", "KMP", "Dijkstra", "Prim"],
                    correct: McqOption::B,
                    explanation: "KMP uses a prefix function to avoid re-scanning.",
                },
            ],
            problem: (
                "Valid Anagram",
                "https://leetcode.com/problems/valid-anagram/",
                Platform::Leetcode,
                &["string", "hashing"],
            ),
            cheat_sheet: ("Strings", "Two pointers, sliding window, prefix function."),
        },
        Topic::Basics => Sample {
            video: ("Loops and conditionals", "https://youtu.be/6iF8Xb7Z3wQ"),
            mcqs: &[SampleMcq {
                question: "How many times does `for i in 0..5` run?",
                options: ["4", "5", "6", "Forever"],
                correct: McqOption::B,
                explanation: "The range excludes its upper bound.",
            }],
            problem: (
                "Solve Me First",
                "https://www.hackerrank.com/challenges/solve-me-first",
                Platform::Hackerrank,
                &["basics"],
            ),
            cheat_sheet: ("Basics", "Read input, loop, branch, print."),
        },
        Topic::BitManipulation => Sample {
            video: ("Bitwise operators", "https://www.youtube.com/watch?v=NLKQEOgBAnw"),
            mcqs: &[SampleMcq {
                question: "What does `x & (x - 1)` do?",
                options: [
                    "Sets the lowest bit",
                    "Clears the lowest set bit",
                    "Flips all bits",
                    "Doubles x",
                ],
                correct: McqOption::B,
                explanation: "Subtracting one flips the trailing zeros and the lowest set bit.",
            }],
            problem: (
                "Single Number",
                "https://leetcode.com/problems/single-number/",
                Platform::Leetcode,
                &["bit manipulation"],
            ),
            cheat_sheet: ("Bits", "XOR cancels pairs; x & -x isolates the lowest bit."),
        },
        Topic::Sorting => Sample {
            video: ("Merge sort", "https://youtu.be/4VqmGXwpLqc"),
            mcqs: &[
                SampleMcq {
                    question: "Which sort is stable?",
                    options: ["Quick sort", "Heap sort", "Merge sort", "Selection sort"],
                    correct: McqOption::C,
                    explanation: "Merge keeps equal keys in input order.",
                },
                SampleMcq {
                    question: "Worst case of quick sort?",
                    options: ["O(n)", "O(n log n)", "O(n^2)", "O(log n)"],
                    correct: McqOption::C,
                    explanation: "Bad pivots split off one element at a time.",
                },
            ],
            problem: (
                "Sort Colors",
                "https://leetcode.com/problems/sort-colors/",
                Platform::Leetcode,
                &["sorting", "two pointers"],
            ),
            cheat_sheet: ("Sorting", "Merge: stable O(n log n). Quick: in place, O(n^2) worst."),
        },
        Topic::Searching => Sample {
            video: ("Binary search", "https://www.youtube.com/watch?v=P3YID7liBug"),
            mcqs: &[SampleMcq {
                question: "Binary search requires the input to be...",
                options: ["Sorted", "Unique", "Non-empty", "Small"],
                correct: McqOption::A,
                explanation: "Halving only works when order is known.",
            }],
            problem: (
                "Binary Search",
                "https://www.geeksforgeeks.org/problems/binary-search-1587115620/1",
                Platform::Geeksforgeeks,
                &["binary search"],
            ),
            cheat_sheet: ("Searching", "lo <= hi, mid = lo + (hi - lo) / 2."),
        },
        Topic::Hashmaps => Sample {
            video: ("Hash tables", "https://youtu.be/shs0KM3wKv8"),
            mcqs: &[SampleMcq {
                question: "Average lookup cost in a hash map?",
                options: ["O(1)", "O(log n)", "O(n)", "O(n log n)"],
                correct: McqOption::A,
                explanation: "With a good hash, buckets stay short.",
            }],
            problem: (
                "Two Sum",
                "https://codeforces.com/problemset/problem/1/A",
                Platform::Codeforces,
                &["hashing"],
            ),
            cheat_sheet: ("Hash maps", "Count with a map; check complement before insert."),
        },
    }
}

fn check_sample(sample: &Sample) -> Result<(), dsa_core::Error> {
    let (title, url) = sample.video;
    validate_listing(title, url)?;
    let (title, url, _, _) = sample.problem;
    validate_listing(title, url)?;
    for mcq in sample.mcqs {
        if mcq.question.trim().is_empty() {
            return Err(ContentError::EmptyTitle.into());
        }
    }
    Ok(())
}

async fn seed_topic(
    storage: &Storage,
    topic: Topic,
    now: DateTime<Utc>,
) -> Result<bool, Box<dyn std::error::Error>> {
    if !storage.content.video_ids(topic).await?.is_empty() {
        return Ok(false);
    }
    let sample = sample_for(topic);
    check_sample(&sample)?;

    let (title, url) = sample.video;
    storage
        .content
        .insert_video(NewVideoRecord {
            topic,
            difficulty: Difficulty::Beginner,
            title: title.into(),
            description: Some(topic.description().into()),
            video_url: url.into(),
            platform: "YouTube".into(),
            duration_minutes: Some(15),
            created_at: now,
        })
        .await?;

    for mcq in sample.mcqs {
        storage
            .content
            .insert_mcq(NewMcqRecord {
                topic,
                difficulty: Difficulty::Beginner,
                question: mcq.question.into(),
                options: mcq.options.map(str::to_owned),
                correct: mcq.correct,
                explanation: Some(mcq.explanation.into()),
                created_at: now,
            })
            .await?;
    }

    let (title, url, platform, tags) = sample.problem;
    storage
        .content
        .insert_problem(NewProblemRecord {
            topic,
            difficulty: Difficulty::Medium,
            title: title.into(),
            description: None,
            problem_url: url.into(),
            platform,
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            created_at: now,
        })
        .await?;

    let (title, content) = sample.cheat_sheet;
    storage
        .content
        .insert_cheat_sheet(NewCheatSheetRecord {
            topic,
            title: title.into(),
            content: content.into(),
            created_at: now - Duration::days(1),
        })
        .await?;

    Ok(true)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    let mut seeded = 0_u32;
    for topic in &args.topics {
        if seed_topic(&storage, *topic, now).await? {
            seeded += 1;
        } else {
            println!("Skipping {topic}: content already present");
        }
    }

    println!(
        "Seeded {seeded} of {} topics into {}",
        args.topics.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
