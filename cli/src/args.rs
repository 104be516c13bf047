use clap::{Args, Parser, Subcommand, ValueEnum};
use todo_core::{SortField, SortOrder};

#[derive(Parser, Debug)]
#[command(name = "todo", version, about, long_about = "Manage todos on a remote todo service")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// API root, e.g. http://localhost:3000/api
    #[arg(long, env = "TODO_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Lists todos, one page at a time.
    List(ListArgs),
    /// Shows a single todo.
    Show(IdArgs),
    /// Creates a new todo.
    Create(CreateArgs),
    /// Edits an existing todo. Only the given fields change.
    Update(UpdateArgs),
    /// Deletes a todo.
    Delete(IdArgs),
}

#[derive(Debug, Args, PartialEq)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
    #[arg(long, value_enum, default_value_t = SortArg::CreatedAt)]
    pub sort: SortArg,
    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    pub order: OrderArg,
    /// Substring match on the title
    #[arg(long)]
    pub title: Option<String>,
    /// Substring match on the description
    #[arg(long)]
    pub description: Option<String>,
    /// Only completed (true) or open (false) todos
    #[arg(long)]
    pub completed: Option<bool>,
}

#[derive(Debug, Args, PartialEq)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Debug, Args, PartialEq)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    /// Start date, YYYY-MM-DD
    #[arg(long)]
    pub start: String,
    /// End date, YYYY-MM-DD
    #[arg(long)]
    pub end: String,
}

#[derive(Debug, Args, PartialEq)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Start date, YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,
    /// End date, YYYY-MM-DD
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum SortArg {
    Title,
    Description,
    StartDate,
    EndDate,
    Completed,
    CreatedAt,
    UpdatedAt,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => SortField::Title,
            SortArg::Description => SortField::Description,
            SortArg::StartDate => SortField::StartDate,
            SortArg::EndDate => SortField::EndDate,
            SortArg::Completed => SortField::IsCompleted,
            SortArg::CreatedAt => SortField::CreatedAt,
            SortArg::UpdatedAt => SortField::UpdatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}
