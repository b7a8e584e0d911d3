use clap::{Args, Parser, Subcommand, ValueEnum};

use box_sdk::{DispositionAction, RetentionPolicyType};

#[derive(Parser, Debug)]
#[command(name = "boxctl", version, about = "Inspect Box content, holds and retention from the command line")]
pub struct Cli {
    #[arg(long, global = true, env = "BOX_TOKEN", hide_env_values = true, help = "Access token (overrides config)")]
    pub token: Option<String>,
    #[arg(long, global = true, help = "API root, e.g. https://api.box.com/2.0/")]
    pub base_url: Option<String>,
    #[arg(
        long,
        global = true,
        value_delimiter = ',',
        help = "Comma-separated fields to request instead of the defaults"
    )]
    pub fields: Vec<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ListArgs {
    #[arg(long, default_value_t = box_sdk::pagination::DEFAULT_LIMIT, help = "Page size")]
    pub limit: u64,
    #[arg(long, help = "Stop after this many entries")]
    pub max: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Who the token belongs to.
    Whoami,
    File {
        #[command(subcommand)]
        command: FileCommands,
    },
    Folder {
        #[command(subcommand)]
        command: FolderCommands,
    },
    LegalHold {
        #[command(subcommand)]
        command: LegalHoldCommands,
    },
    Retention {
        #[command(subcommand)]
        command: RetentionCommands,
    },
    FileVersionRetention {
        #[command(subcommand)]
        command: FileVersionRetentionCommands,
    },
    Metadata {
        #[command(subcommand)]
        command: MetadataCommands,
    },
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    Info { id: String },
    Versions { id: String },
    Tasks { id: String },
    Download {
        id: String,
        #[arg(long, short)]
        output: std::path::PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum FolderCommands {
    Info { id: String },
    List {
        #[arg(default_value = "0")]
        id: String,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum LegalHoldCommands {
    Info { id: String },
    List {
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    Assignments {
        id: String,
        #[arg(long, value_enum)]
        assign_to_type: Option<AssignTarget>,
        #[arg(long, requires = "assign_to_type")]
        assign_to_id: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum RetentionCommands {
    Info { id: String },
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        policy_type: Option<PolicyTypeArg>,
        #[arg(long)]
        created_by: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    Assignments {
        id: String,
        #[arg(long, value_enum)]
        assign_to_type: Option<RetentionTarget>,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum FileVersionRetentionCommands {
    Info { id: String },
    List {
        #[arg(long)]
        file_id: Option<String>,
        #[arg(long)]
        file_version_id: Option<String>,
        #[arg(long)]
        policy_id: Option<String>,
        #[arg(long, value_enum)]
        disposition_action: Option<DispositionArg>,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum MetadataCommands {
    Get {
        #[arg(value_enum)]
        item_type: ItemType,
        id: String,
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        scope: Option<String>,
    },
    List {
        #[arg(value_enum)]
        item_type: ItemType,
        id: String,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    Get {
        template: String,
        #[arg(long, default_value = "enterprise")]
        scope: String,
    },
    List {
        #[arg(long, default_value = "enterprise")]
        scope: String,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    Info { id: String },
    Assignments { id: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ItemType {
    File,
    Folder,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AssignTarget {
    File,
    FileVersion,
    Folder,
    User,
}

impl AssignTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignTarget::File => box_sdk::resources::legal_hold_assignment::TYPE_FILE,
            AssignTarget::FileVersion => box_sdk::resources::legal_hold_assignment::TYPE_FILE_VERSION,
            AssignTarget::Folder => box_sdk::resources::legal_hold_assignment::TYPE_FOLDER,
            AssignTarget::User => box_sdk::resources::legal_hold_assignment::TYPE_USER,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RetentionTarget {
    Enterprise,
    Folder,
}

impl RetentionTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            RetentionTarget::Enterprise => box_sdk::resources::retention_policy_assignment::TYPE_ENTERPRISE,
            RetentionTarget::Folder => box_sdk::resources::retention_policy_assignment::TYPE_FOLDER,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PolicyTypeArg {
    Finite,
    Indefinite,
}

impl From<PolicyTypeArg> for RetentionPolicyType {
    fn from(value: PolicyTypeArg) -> Self {
        match value {
            PolicyTypeArg::Finite => RetentionPolicyType::Finite,
            PolicyTypeArg::Indefinite => RetentionPolicyType::Indefinite,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DispositionArg {
    PermanentlyDelete,
    RemoveRetention,
}

impl From<DispositionArg> for DispositionAction {
    fn from(value: DispositionArg) -> Self {
        match value {
            DispositionArg::PermanentlyDelete => DispositionAction::PermanentlyDelete,
            DispositionArg::RemoveRetention => DispositionAction::RemoveRetention,
        }
    }
}
