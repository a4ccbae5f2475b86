//! `articles` commands.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use nnews_client::{
    parse_datetime, ArticleEditor, ArticleGenerator, GenerationMode, ImageUpload, NewsContext,
};
use nnews_shared::{preview, ArticleQuery};
use serde_json::json;

use super::print_json;
use crate::cli::{ArticleCommands, ArticleFields};

/// Run one article command and print its result.
pub async fn run(context: &NewsContext, command: ArticleCommands) -> Result<()> {
    let store = context.article_store();

    match command {
        ArticleCommands::List {
            category_id,
            roles,
            page,
            page_size,
        } => {
            let query = ArticleQuery {
                category_id,
                roles,
                page,
                page_size,
            };
            let articles = store.fetch(query).await.context("failed to list articles")?;
            print_json(&json!({
                "items": articles.items,
                "page": articles.page,
                "pageSize": articles.page_size,
                "totalCount": articles.total_count,
                "totalPages": articles.total_pages,
                "hasPrevious": articles.has_previous(),
                "hasNext": articles.has_next(),
            }))
        },
        ArticleCommands::Get {
            id,
        } => {
            let article = store
                .get_by_id(id)
                .await
                .with_context(|| format!("failed to load article {id}"))?;
            print_json(&article)
        },
        ArticleCommands::Create(fields) => {
            let mut editor = ArticleEditor::new();
            fill_editor(&mut editor, fields)?;
            let article = editor.save(&store).await.context("failed to create article")?;
            print_json(&article)
        },
        ArticleCommands::Update {
            id,
            fields,
        } => {
            let existing = store
                .get_by_id(id)
                .await
                .with_context(|| format!("failed to load article {id}"))?;
            let mut editor = ArticleEditor::from_article(&existing);
            fill_editor(&mut editor, fields)?;
            let article = editor
                .save(&store)
                .await
                .with_context(|| format!("failed to update article {id}"))?;
            print_json(&article)
        },
        ArticleCommands::Delete {
            id,
        } => {
            store
                .delete(id)
                .await
                .with_context(|| format!("failed to delete article {id}"))?;
            print_json(&json!({ "deleted": id }))
        },
        ArticleCommands::Generate {
            prompt,
            article_id,
            image,
        } => {
            let generator = match article_id {
                Some(article_id) => ArticleGenerator::for_update(store.api().clone(), article_id),
                None => ArticleGenerator::new(store.api().clone(), GenerationMode::Create),
            };
            generator.open();
            generator.set_prompt(prompt);
            generator.set_generate_image(image);

            let article = generator
                .generate(|step| tracing::info!("{step}"))
                .await
                .context("ai generation failed")?;
            print_json(&article)
        },
        ArticleCommands::UploadImage {
            file,
        } => {
            let image = read_image(&file)?;
            let reference = store
                .api()
                .upload_image(image)
                .await
                .with_context(|| format!("failed to upload {}", file.display()))?;
            print_json(&json!({ "imageName": reference }))
        },
        ArticleCommands::Preview {
            file,
            image_base,
        } => {
            let markdown = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let html = match image_base {
                Some(base) => preview::markdown_to_html_with_images(&markdown, &base),
                None => preview::markdown_to_html(&markdown),
            };
            println!("{html}");
            Ok(())
        },
    }
}

/// Apply command line fields to the form. Options that were not given keep
/// the article's current values. `--role` replaces the role set and
/// `--public` clears it.
pub fn fill_editor(editor: &mut ArticleEditor, fields: ArticleFields) -> Result<()> {
    editor.title = fields.title;
    editor.content = match fields.content.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read article content from {path}"))?,
        None => fields.content,
    };
    if let Some(status) = fields.status {
        editor.status = status;
    }
    if fields.category_id.is_some() {
        editor.category_id = fields.category_id;
    }
    if let Some(tags) = fields.tags {
        editor.tag_list = tags;
    }
    if let Some(raw) = fields.date_at {
        editor.date_at = parse_datetime(&raw).with_context(|| format!("invalid date `{raw}`"))?;
    }
    if fields.public {
        editor.set_visible_to_all(true);
    } else if !fields.roles.is_empty() {
        editor.set_visible_to_all(true);
        editor.set_visible_to_all(false);
        for role in fields.roles {
            if !editor.selected_roles().contains(&role) {
                editor.toggle_role(&role);
            }
        }
    }
    if let Some(image_name) = fields.image_name {
        editor.set_image_name(image_name);
    }
    Ok(())
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let content_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        other => bail!("unsupported image extension `{other}`"),
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(ImageUpload::new(file_name, content_type, bytes))
}
