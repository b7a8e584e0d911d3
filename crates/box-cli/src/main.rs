//! # boxctl
//!
//! Read-only command-line access to a Box account through `box-sdk`.
//! Every command prints pretty JSON on stdout; logs go to stderr.

mod cli;

use anyhow::Context;
use box_sdk::{
    BoxApiConnection, BoxConfig, BoxFile, BoxFileVersionRetention, BoxFolder, BoxLegalHold, BoxResourceIterable,
    BoxRetentionPolicy, BoxTask, BoxUser, FileVersionRetentionQuery, MetadataTemplate, RetentionPolicyFilter,
};
use clap::Parser;
use futures_util::{pin_mut, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

use cli::{
    Cli, Commands, FileCommands, FileVersionRetentionCommands, FolderCommands, ItemType, LegalHoldCommands, ListArgs,
    MetadataCommands, RetentionCommands, TaskCommands, TemplateCommands,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "box_sdk=info,boxctl=info".into()),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut config = BoxConfig::load().context("loading Box configuration")?;
    if let Some(token) = &cli.token {
        config.api.access_token = token.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if config.api.access_token.is_empty() {
        tracing::warn!("no access token configured; set BOX_TOKEN or BOX__API__ACCESS_TOKEN");
    }

    let api = BoxApiConnection::from_config(&config)?;
    tracing::debug!(base_url = %api.base_url(), "connected");

    let fields: Vec<&str> = cli.fields.iter().map(String::as_str).collect();
    run(&api, cli.command, &fields).await
}

async fn run(api: &BoxApiConnection, command: Commands, fields: &[&str]) -> anyhow::Result<()> {
    match command {
        Commands::Whoami => print_json(&BoxUser::current(api).get_info(fields).await?),

        Commands::File { command } => match command {
            FileCommands::Info { id } => print_json(&BoxFile::new(api, id).get_info(fields).await?),
            FileCommands::Versions { id } => print_json(&BoxFile::new(api, id).get_versions().await?),
            FileCommands::Tasks { id } => print_json(&BoxFile::new(api, id).get_tasks(fields).await?),
            FileCommands::Download { id, output } => {
                let bytes = BoxFile::new(api, id).download().await?;
                tokio::fs::write(&output, &bytes)
                    .await
                    .with_context(|| format!("writing {}", output.display()))?;
                tracing::info!(path = %output.display(), size = bytes.len(), "downloaded");
                Ok(())
            }
        },

        Commands::Folder { command } => match command {
            FolderCommands::Info { id } => print_json(&BoxFolder::new(api, id).get_info(fields).await?),
            FolderCommands::List { id, list } => {
                let children = BoxFolder::new(api, id).get_children(list.limit, fields)?;
                print_list(&children, list).await
            }
        },

        Commands::LegalHold { command } => match command {
            LegalHoldCommands::Info { id } => print_json(&BoxLegalHold::new(api, id).get_info(fields).await?),
            LegalHoldCommands::List { name, list } => {
                let policies = BoxLegalHold::get_all(api, name.as_deref(), list.limit, fields)?;
                print_list(&policies, list).await
            }
            LegalHoldCommands::Assignments { id, assign_to_type, assign_to_id, list } => {
                let assignments = BoxLegalHold::new(api, id).get_assignments(
                    assign_to_type.map(|t| t.as_str()),
                    assign_to_id.as_deref(),
                    list.limit,
                    fields,
                )?;
                print_list(&assignments, list).await
            }
        },

        Commands::Retention { command } => match command {
            RetentionCommands::Info { id } => print_json(&BoxRetentionPolicy::new(api, id).get_info(fields).await?),
            RetentionCommands::List { name, policy_type, created_by, list } => {
                let filter = RetentionPolicyFilter {
                    policy_name: name,
                    policy_type: policy_type.map(Into::into),
                    created_by_user_id: created_by,
                };
                let policies = BoxRetentionPolicy::get_all(api, &filter, list.limit, fields)?;
                print_list(&policies, list).await
            }
            RetentionCommands::Assignments { id, assign_to_type, list } => {
                let assignments = BoxRetentionPolicy::new(api, id).get_assignments(
                    assign_to_type.map(|t| t.as_str()),
                    list.limit,
                    fields,
                )?;
                print_list(&assignments, list).await
            }
        },

        Commands::FileVersionRetention { command } => match command {
            FileVersionRetentionCommands::Info { id } => {
                print_json(&BoxFileVersionRetention::new(api, id).get_info(fields).await?)
            }
            FileVersionRetentionCommands::List { file_id, file_version_id, policy_id, disposition_action, list } => {
                let query = FileVersionRetentionQuery {
                    file_id,
                    file_version_id,
                    policy_id,
                    disposition_action: disposition_action.map(Into::into),
                    ..Default::default()
                };
                let retentions = BoxFileVersionRetention::get_all(api, &query, list.limit, fields)?;
                print_list(&retentions, list).await
            }
        },

        Commands::Metadata { command } => match command {
            MetadataCommands::Get { item_type, id, template, scope } => {
                let metadata = match item_type {
                    ItemType::File => BoxFile::new(api, id).get_metadata(template.as_deref(), scope.as_deref()).await?,
                    ItemType::Folder => {
                        BoxFolder::new(api, id).get_metadata(template.as_deref(), scope.as_deref()).await?
                    }
                };
                print_json(&metadata)
            }
            MetadataCommands::List { item_type, id, list } => {
                let all = match item_type {
                    ItemType::File => BoxFile::new(api, id).get_all_metadata(list.limit, fields)?,
                    ItemType::Folder => BoxFolder::new(api, id).get_all_metadata(list.limit, fields)?,
                };
                print_list(&all, list).await
            }
        },

        Commands::Template { command } => match command {
            TemplateCommands::Get { template, scope } => {
                print_json(&MetadataTemplate::get_metadata_template(api, &template, &scope, fields).await?)
            }
            TemplateCommands::List { scope, list } => {
                let templates = MetadataTemplate::get_enterprise_metadata_templates(api, &scope, list.limit, fields)?;
                print_list(&templates, list).await
            }
        },

        Commands::Task { command } => match command {
            TaskCommands::Info { id } => print_json(&BoxTask::new(api, id).get_info(fields).await?),
            TaskCommands::Assignments { id } => print_json(&BoxTask::new(api, id).get_assignments().await?),
        },
    }
}

// ── Output ──────────────────────────────────────────────────────────────────

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Pull entries page by page, stopping early once `--max` is reached.
async fn print_list<T>(iterable: &BoxResourceIterable<T>, list: ListArgs) -> anyhow::Result<()>
where
    T: DeserializeOwned + Serialize,
{
    let stream = iterable.stream();
    pin_mut!(stream);

    let mut entries = Vec::new();
    while let Some(entry) = stream.try_next().await? {
        entries.push(entry);
        if list.max.is_some_and(|max| entries.len() >= max) {
            break;
        }
    }
    tracing::debug!(count = entries.len(), url = %iterable.url(), "listed");
    print_json(&entries)
}
