//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Course draft authoring: build modules, lessons and quizzes, validate and submit
#[derive(Parser, Debug)]
#[command(name = "coursedraft")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding the local .coursedraft.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an empty draft document (.toml or .json)
    New {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Initial course title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Print the draft as a tree
    Show {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Set one field, e.g. `modules/<id>/lessons/<id>/videoUrl`
    Set {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Field path
        path: String,
        /// New value; empty clears dates and category
        value: String,
    },

    /// Add a module, lesson, question, option or files
    Add {
        #[command(subcommand)]
        command: AddCommands,
    },

    /// Remove a module, lesson, question, option or file
    Remove {
        #[command(subcommand)]
        command: RemoveCommands,
    },

    /// Report every violation that would block submission
    Validate {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the submission payload as JSON
    Payload {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        submitter: SubmitterArgs,
    },

    /// Validate and hand the draft to the course store
    Submit {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        submitter: SubmitterArgs,
    },

    /// List courses available for duplication
    Courses {
        /// Owner whose courses are listed
        #[arg(long)]
        owner: String,
    },

    /// Seed a new draft from a document or a stored course id
    Duplicate {
        /// Draft document path or course id
        source: String,
        /// Destination document
        #[arg(value_hint = ValueHint::FilePath)]
        dest: PathBuf,
    },

    /// Grade learner attempts, one JSON list of {questionId, selectedAnswer} per file
    Grade {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Module id
        module: String,
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        responses: Vec<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(clap::Args, Debug)]
pub struct SubmitterArgs {
    /// Owner (professor) id
    #[arg(long)]
    pub owner: String,
    /// Instructor display name
    #[arg(long)]
    pub instructor: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AddCommands {
    /// Append a module
    Module {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Append a lesson to a module
    Lesson {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        module: String,
    },
    /// Append a multiple choice question to a module assessment
    Question {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        module: String,
    },
    /// Append an empty option to a question
    #[command(name = "option")]
    AnswerOption {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        module: String,
        question: String,
    },
    /// Attach files to a lesson
    Files {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        module: String,
        lesson: String,
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RemoveCommands {
    /// Remove a module with everything below it
    Module {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        module: String,
    },
    /// Remove a lesson and its files
    Lesson {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        module: String,
        lesson: String,
    },
    /// Remove an assessment question
    Question {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        module: String,
        question: String,
    },
    /// Remove an option by position
    #[command(name = "option")]
    AnswerOption {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        module: String,
        question: String,
        index: usize,
    },
    /// Detach a file from a lesson
    File {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        module: String,
        lesson: String,
        file_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a config template
    Template,

    /// Show config paths
    Path,
}
