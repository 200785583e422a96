use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clipling")]
#[command(about = "Clipboard translation with endpoint fallback and cached speech")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,

    /// Config file (defaults to ~/.config/clipling/config.toml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Show debug logs
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Only print results and errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Where the text to process comes from.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// File to read (reads from stdin if neither FILE nor --text is given)
    pub file: Option<String>,

    /// Inline text instead of a file or stdin
    #[arg(short = 'x', long)]
    pub text: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate text using the translate endpoints
    Translate(InputArgs),
    /// Fix grammar using the fix_grammar endpoints
    Fix(InputArgs),
    /// Get a structured grammar lesson from the learn_grammar endpoints
    Learn(InputArgs),
    /// Synthesize speech and print the audio file path
    Speak {
        #[command(flatten)]
        input: InputArgs,

        /// Language code for the voice (defaults to [tts] language)
        #[arg(short = 'l', long)]
        lang: Option<String>,
    },
    /// Show endpoint fallback order
    Endpoints {
        /// translate, fix_grammar or learn_grammar (all if omitted)
        category: Option<String>,
    },
    /// Manage the speech cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum CacheCommand {
    /// Show cache location and size
    Info,
    /// Remove expired entries and orphan files
    Sweep,
    /// Delete every cached file
    Clear,
}
