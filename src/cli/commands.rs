use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tdc",
    about = concat!("tdc v", env!("CARGO_PKG_VERSION"), " - tasks, projects, sections and labels from the terminal"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// API token (overrides environment and config file)
    #[arg(short = 'k', long = "api-key", visible_alias = "api-token", value_name = "TOKEN", global = true)]
    pub api_key: Option<String>,

    /// Strip emoji from displayed text
    #[arg(short = 'E', long, global = true)]
    pub strip_emojis: bool,

    /// Show an ID column in tables
    #[arg(short = 'i', long, global = true)]
    pub ids: bool,

    /// Output as JSON
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Project (partial name or numeric ID)
    #[arg(short = 'p', long, global = true)]
    pub project: Option<String>,

    /// Include subtasks in task listings
    #[arg(short = 's', long, global = true)]
    pub subtasks: bool,

    /// Section (partial name, requires --project)
    #[arg(short = 'S', long, global = true)]
    pub section: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List and manage tasks
    #[command(visible_aliases = ["tasks", "t", "ta"])]
    Task(TaskCmd),
    /// List and manage projects
    #[command(visible_aliases = ["projects", "proj", "pro", "p"])]
    Project(EntityCmd),
    /// List and manage sections of a project
    #[command(visible_aliases = ["sections", "sect", "sec", "s"])]
    Section(EntityCmd),
    /// List and manage labels
    #[command(visible_aliases = ["labels", "lab", "lbl"])]
    Label(EntityCmd),
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks
    #[command(visible_aliases = ["ls", "l"])]
    List(TaskListArgs),
    /// List tasks due today or overdue
    #[command(visible_aliases = ["td", "to"])]
    Today,
    /// Create a task (skipped if one with the same content exists)
    #[command(visible_aliases = ["cr", "c", "add", "a"])]
    Create(TaskCreateArgs),
    /// Update a task found by its exact content
    #[command(visible_aliases = ["upd", "u"])]
    Update(TaskUpdateArgs),
    /// Mark a task done
    Done(TaskContentArg),
    /// Delete a task
    #[command(visible_aliases = ["del", "d", "remove", "rm"])]
    Delete(TaskContentArg),
}

#[derive(Args)]
pub struct TaskListArgs {
    /// Only tasks due today (combines with --overdue as a union)
    #[arg(long)]
    pub today: bool,
    /// Only tasks past their due date
    #[arg(long)]
    pub overdue: bool,
    /// Only recurring tasks
    #[arg(long)]
    pub recurring: bool,
}

#[derive(Args)]
pub struct TaskCreateArgs {
    /// Task content
    pub content: String,
    /// Priority from 1 (normal) to 4 (urgent)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub priority: Option<u8>,
    /// Due date in natural language, e.g. "tomorrow 5pm"
    #[arg(long)]
    pub due: Option<String>,
    /// Reminder time in natural language
    #[arg(long)]
    pub reminder: Option<String>,
    /// Create even if a task with the same content exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct TaskUpdateArgs {
    /// Current task content (exact, case-insensitive)
    pub content: String,
    /// Replacement content
    #[arg(long)]
    pub new_content: Option<String>,
    /// New priority from 1 to 4
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub priority: Option<u8>,
    /// New due date in natural language
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct TaskContentArg {
    /// Task content (exact, case-insensitive)
    pub content: String,
}

// ---------------------------------------------------------------------------
// Projects, sections and labels
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct EntityCmd {
    #[command(subcommand)]
    pub action: EntityAction,
}

#[derive(Subcommand)]
pub enum EntityAction {
    /// List by name
    #[command(visible_aliases = ["ls", "l"])]
    List,
    /// Create (skipped if the name already exists)
    #[command(visible_aliases = ["cr", "c", "add", "a"])]
    Create(NameArg),
    /// Rename (exact, case-insensitive name)
    #[command(visible_aliases = ["upd", "u"])]
    Update(RenameArgs),
    /// Delete (exact name first, then first partial match)
    #[command(visible_aliases = ["del", "d", "remove", "rm"])]
    Delete(NameArg),
}

#[derive(Args)]
pub struct NameArg {
    /// Name
    pub name: String,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Current name
    pub name: String,
    /// New name
    #[arg(long, required = true)]
    pub new_name: String,
}
