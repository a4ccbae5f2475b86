//! `categories` commands.

use anyhow::{Context, Result};
use nnews_client::NewsContext;
use nnews_shared::{CategoryInput, CategoryQuery, CategoryUpdate};
use serde_json::json;

use super::print_json;
use crate::cli::CategoryCommands;

/// Run one category command and print its result.
pub async fn run(context: &NewsContext, command: CategoryCommands) -> Result<()> {
    let store = context.category_store();

    match command {
        CategoryCommands::List {
            roles,
            parent_id,
            search,
        } => {
            let categories = store
                .fetch(CategoryQuery {
                    roles,
                    parent_id,
                    search_term: search,
                })
                .await
                .context("failed to list categories")?;
            print_json(&categories)
        },
        CategoryCommands::Get {
            id,
        } => {
            let category = store
                .get_by_id(id)
                .await
                .with_context(|| format!("failed to load category {id}"))?;
            print_json(&category)
        },
        CategoryCommands::Create {
            title,
            parent_id,
        } => {
            let category = store
                .create(&CategoryInput {
                    title,
                    parent_id,
                })
                .await
                .context("failed to create category")?;
            print_json(&category)
        },
        CategoryCommands::Update {
            id,
            title,
            parent_id,
        } => {
            let category = store
                .update(&CategoryUpdate {
                    category_id: id,
                    category: CategoryInput {
                        title,
                        parent_id,
                    },
                })
                .await
                .with_context(|| format!("failed to update category {id}"))?;
            print_json(&category)
        },
        CategoryCommands::Delete {
            id,
        } => {
            store
                .delete(id)
                .await
                .with_context(|| format!("failed to delete category {id}"))?;
            print_json(&json!({ "deleted": id }))
        },
    }
}
