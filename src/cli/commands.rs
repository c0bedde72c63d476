use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lanes", about = concat!("lanes v", env!("CARGO_PKG_VERSION"), " - a kanban board made of markdown files"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Board directory (overrides base_dir from the config file)
    #[arg(short = 'C', long = "base-dir", global = true)]
    pub base_dir: Option<String>,

    /// Config file (JSON, or TOML with a .toml extension)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks, optionally filtered by lane, tag or pattern
    List(ListArgs),
    /// Show one task
    Show(ShowArgs),
    /// List lanes with task counts
    Lanes,
    /// Show lane, tag and due-date statistics
    Stats,
    /// Create a task
    Add(AddArgs),
    /// Create a task from a JSON object
    AddJson(AddJsonArgs),
    /// Change a task's content, tags, title or due date
    Update(UpdateArgs),
    /// Move a task to another lane (created if missing)
    Mv(MvArgs),
    /// Create a lane
    AddLane(AddLaneArgs),
    /// Split tasks containing [[split]] and move the originals to the trash
    Split,
    /// Create tasks from a CSV file (columns: title, task, tag_list, lane[, due_date])
    Import(ImportArgs),
    /// Permanently delete archived tasks
    EmptyTrash,
    /// Rewrite legacy `tags:` lines as [tag:...] annotations
    MigrateTags(MigrateTagsArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks in this lane
    #[arg(long)]
    pub lane: Option<String>,
    /// Only tasks carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Only tasks whose title or content matches this regex
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task title
    pub title: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title (also the file name)
    pub title: String,
    /// Lane to create the task in
    #[arg(long)]
    pub lane: String,
    /// Task body
    #[arg(long, default_value = "")]
    pub content: String,
    /// Tag (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct AddJsonArgs {
    /// JSON object with title, content, lane and optional tags, due_date
    #[arg(id = "json_object", value_name = "JSON")]
    pub json: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Current task title
    pub title: String,
    /// New content
    #[arg(long)]
    pub content: Option<String>,
    /// New comma-separated tag list (replaces existing tags)
    #[arg(long)]
    pub tags: Option<String>,
    /// New title
    #[arg(long = "title")]
    pub new_title: Option<String>,
    /// New due date (YYYY-MM-DD), or "" to clear it
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task title
    pub title: String,
    /// Destination lane
    pub lane: String,
}

#[derive(Args)]
pub struct AddLaneArgs {
    /// Lane name
    pub name: String,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Path to the CSV file
    pub file: String,
}

#[derive(Args)]
pub struct MigrateTagsArgs {
    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
