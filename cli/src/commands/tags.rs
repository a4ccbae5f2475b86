//! `tags` commands.

use anyhow::{Context, Result};
use nnews_client::{NewsContext, TagMerge};
use nnews_shared::{TagInput, TagQuery, TagUpdate};
use serde_json::json;

use super::print_json;
use crate::cli::TagCommands;

/// Run one tag command and print its result.
pub async fn run(context: &NewsContext, command: TagCommands) -> Result<()> {
    let store = context.tag_store();

    match command {
        TagCommands::List {
            search,
        } => {
            let tags = store
                .fetch(TagQuery {
                    search_term: search,
                })
                .await
                .context("failed to list tags")?;
            print_json(&tags)
        },
        TagCommands::Get {
            id,
        } => {
            let tag = store
                .get_by_id(id)
                .await
                .with_context(|| format!("failed to load tag {id}"))?;
            print_json(&tag)
        },
        TagCommands::Create {
            title,
            slug,
        } => {
            let tag = store
                .create(&TagInput {
                    title,
                    slug,
                })
                .await
                .context("failed to create tag")?;
            print_json(&tag)
        },
        TagCommands::Update {
            id,
            title,
            slug,
        } => {
            let tag = store
                .update(&TagUpdate {
                    tag_id: id,
                    tag: TagInput {
                        title,
                        slug,
                    },
                })
                .await
                .with_context(|| format!("failed to update tag {id}"))?;
            print_json(&tag)
        },
        TagCommands::Delete {
            id,
        } => {
            store
                .delete(id)
                .await
                .with_context(|| format!("failed to delete tag {id}"))?;
            print_json(&json!({ "deleted": id }))
        },
        TagCommands::Merge {
            source,
            target,
        } => {
            // the merge dialog works on the loaded list, so load it first
            let tags = store.fetch(TagQuery::default()).await.context("failed to list tags")?;
            let source_tag = tags
                .iter()
                .find(|tag| tag.tag_id == Some(source))
                .cloned()
                .with_context(|| format!("tag {source} not found"))?;

            let mut merge = TagMerge::new(source_tag, tags);
            merge.select_target(Some(target));
            merge
                .submit(&store)
                .await
                .with_context(|| format!("failed to merge tag {source} into {target}"))?;
            print_json(&json!({
                "merged": source,
                "into": target,
                "remaining": store.tags().len(),
            }))
        },
    }
}
