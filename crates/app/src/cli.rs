use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use services::grading::{
    DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TIMEOUT, credential_state,
};

#[derive(Debug, Parser)]
#[command(
    name = "civics-quiz",
    version,
    about = "Practice the U.S. civics test with answers graded by a language model",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Quiz options used when no subcommand is given.
    #[command(flatten)]
    pub quiz: QuizArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Take the quiz in this terminal (default).
    Quiz(QuizArgs),
    /// Take the quiz in a desktop window.
    Ui(QuizArgs),
    /// Serve the grading endpoint over HTTP.
    Serve(ServeArgs),
}

/// Settings for talking to the chat-completions classifier.
#[derive(Clone, Args)]
pub struct ClassifierArgs {
    /// Classifier API key. Falls back to `OPENROUTER_API_KEY`.
    #[arg(long, env = "CIVICS_AI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "CIVICS_AI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "CIVICS_AI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "CIVICS_AI_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Per-request timeout in seconds.
    #[arg(long, env = "CIVICS_AI_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

impl fmt::Debug for ClassifierArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierArgs")
            .field("api_key", &credential_state(self.api_key.as_deref()))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Args)]
pub struct QuizArgs {
    #[command(flatten)]
    pub classifier: ClassifierArgs,

    /// Grade through a running `serve` endpoint instead of calling the classifier directly.
    #[arg(long, env = "CIVICS_GRADER_URL")]
    pub grader_url: Option<String>,

    /// JSON file of `{ "question", "answers" }` records to draw from instead of the built-in pool.
    #[arg(long, env = "CIVICS_QUESTIONS")]
    pub questions: Option<PathBuf>,

    /// Seed for the question draw.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub classifier: ClassifierArgs,

    #[arg(long, env = "CIVICS_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,
}

impl Cli {
    /// The subcommand to run; a terminal quiz when none was given.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Quiz(self.quiz))
    }
}
