use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use bujo_core::EntryKind;

#[derive(Parser)]
#[command(name = "bujo")]
#[command(about = "Bullet journal companion from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the journal API
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory for the local entry mirror
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Quick capture: bujo "my task here"
    #[arg(trailing_var_arg = true)]
    pub entry: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new entry
    #[command(alias = "new")]
    Add {
        /// Entry title
        title: Vec<String>,
        /// Entry kind
        #[arg(short = 'k', long, value_enum, default_value_t = KindArg::Task)]
        kind: KindArg,
        /// Longer notes attached to the entry
        #[arg(short, long)]
        notes: Option<String>,
        /// Associated date (YYYY-MM-DD)
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Tags, repeatable
        #[arg(short, long, value_name = "TAG")]
        tag: Vec<String>,
    },
    /// List entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Filter by entry kind
        #[arg(short = 'k', long, value_enum)]
        kind: Option<KindArg>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Skip the remote fetch and list the local mirror only
        #[arg(long)]
        local: bool,
    },
    /// Toggle an entry's completion flag
    Done {
        /// Entry ID
        id: String,
    },
    /// Edit an existing entry
    Edit {
        /// Entry ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
        /// New kind
        #[arg(short = 'k', long, value_enum)]
        kind: Option<KindArg>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Replace tags, repeatable
        #[arg(long, value_name = "TAG")]
        tag: Vec<String>,
    },
    /// Delete an existing entry
    Delete {
        /// Entry ID
        id: String,
    },
    /// Show dashboard statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the account session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Upload a journal page image for text extraction
    Scan {
        /// Path to the page image (jpg/png/heic)
        image: PathBuf,
        /// Page number within the journal
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Scan thread to attach the page to
        #[arg(long, value_name = "ID")]
        thread: Option<String>,
    },
    /// Fetch previously extracted page data
    Extract {
        /// Restrict to one journal page
        #[arg(long, value_name = "ID")]
        page_id: Option<String>,
    },
    /// Fetch the TaskPaper/Markdown export report
    Export {
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Login with email/password and store the session in the keychain
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create a new account
    Signup {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password (minimum 6 characters)
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Password confirmation
        #[arg(long, value_name = "PASSWORD")]
        confirm_password: String,
        /// First name
        #[arg(long, value_name = "NAME")]
        first_name: String,
        /// Last name
        #[arg(long, value_name = "NAME")]
        last_name: String,
        /// Optional phone number
        #[arg(long, value_name = "PHONE")]
        phone: Option<String>,
    },
    /// Show the current session
    Status,
    /// Clear the stored session
    Logout,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum KindArg {
    Task,
    Note,
    Event,
    Habit,
    Emotion,
}

impl From<KindArg> for EntryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Task => Self::Task,
            KindArg::Note => Self::Note,
            KindArg::Event => Self::Event,
            KindArg::Habit => Self::Habit,
            KindArg::Emotion => Self::Emotion,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
