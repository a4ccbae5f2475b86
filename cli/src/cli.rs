//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nnews_shared::ArticleStatus;

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(name = "nnews", version, about = "NNews content API client")]
pub struct Cli {
    /// Server origin. Overrides `NNEWS_API_URL`.
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Path prefix of every endpoint. Overrides `NNEWS_API_BASE_PATH`.
    #[arg(long, global = true)]
    pub base_path: Option<String>,
    /// Bearer token sent as `Authorization`. Overrides `NNEWS_API_TOKEN`.
    #[arg(long, global = true)]
    pub token: Option<String>,
    /// Request timeout in seconds. Overrides `NNEWS_HTTP_TIMEOUT_SECONDS`.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
    /// Resource to work on.
    #[command(subcommand)]
    pub command: Commands,
}

/// Resource groups.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Article commands.
    Articles {
        /// Article action.
        #[command(subcommand)]
        command: ArticleCommands,
    },
    /// Category commands.
    Categories {
        /// Category action.
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Tag commands.
    Tags {
        /// Tag action.
        #[command(subcommand)]
        command: TagCommands,
    },
}

/// Article commands.
#[derive(Subcommand, Debug)]
pub enum ArticleCommands {
    /// GET /article, or /article/filter when roles are given.
    List {
        /// Category id (sent as the parent category when filtering by role).
        #[arg(long)]
        category_id: Option<i64>,
        /// Restrict to a role slug. Repeatable.
        #[arg(long = "role")]
        roles: Vec<String>,
        /// 1-based page.
        #[arg(long)]
        page: Option<u32>,
        /// Articles per page.
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// GET /article/:id
    Get {
        /// Id to load.
        id: i64,
    },
    /// POST /article
    Create(ArticleFields),
    /// PUT /article
    Update {
        /// Article to update.
        id: i64,
        /// New values. Omitted options keep the current ones.
        #[command(flatten)]
        fields: ArticleFields,
    },
    /// DELETE /article/:id
    Delete {
        /// Id to delete.
        id: i64,
    },
    /// Write or rewrite an article with AI.
    Generate {
        /// What the article should be about, or what to change.
        #[arg(long)]
        prompt: String,
        /// Rewrite this article instead of creating a new one.
        #[arg(long)]
        article_id: Option<i64>,
        /// Also generate a cover image.
        #[arg(long)]
        image: bool,
    },
    /// POST /Image/uploadImage
    UploadImage {
        /// Image file to upload.
        file: PathBuf,
    },
    /// Render a markdown file to sanitized HTML, locally.
    Preview {
        /// Markdown file.
        file: PathBuf,
        /// Base URL relative image links resolve against.
        #[arg(long)]
        image_base: Option<String>,
    },
}

/// Editable article fields shared by `create` and `update`.
#[derive(Args, Debug, Clone)]
pub struct ArticleFields {
    /// Headline.
    #[arg(long)]
    pub title: String,
    /// Body text, or `@path` to read it from a file.
    #[arg(long)]
    pub content: String,
    /// `draft`, `published`, `archived`, `scheduled`, `review` or the code.
    /// Defaults to `draft` for new articles.
    #[arg(long)]
    pub status: Option<ArticleStatus>,
    /// Category to file the article under.
    #[arg(long)]
    pub category_id: Option<i64>,
    /// Comma separated tag titles.
    #[arg(long)]
    pub tags: Option<String>,
    /// Image reference returned by `upload-image`.
    #[arg(long)]
    pub image_name: Option<String>,
    /// Publish date, RFC 3339 or `YYYY-MM-DD`.
    #[arg(long)]
    pub date_at: Option<String>,
    /// Restrict visibility to a role slug. Repeatable. Replaces the roles
    /// of an existing article.
    #[arg(long = "role", conflicts_with = "public")]
    pub roles: Vec<String>,
    /// Make the article visible to everyone, dropping its roles.
    #[arg(long)]
    pub public: bool,
}

/// Category commands.
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// GET /category, or /category/filter with roles or a parent.
    List {
        /// Restrict to a role slug. Repeatable.
        #[arg(long = "role")]
        roles: Vec<String>,
        /// Only children of this category.
        #[arg(long)]
        parent_id: Option<i64>,
        /// Case-insensitive title search, applied locally.
        #[arg(long)]
        search: Option<String>,
    },
    /// GET /category/:id
    Get {
        /// Id to load.
        id: i64,
    },
    /// POST /category
    Create {
        /// Display title.
        #[arg(long)]
        title: String,
        /// Parent category.
        #[arg(long)]
        parent_id: Option<i64>,
    },
    /// PUT /category
    Update {
        /// Category to update.
        id: i64,
        /// Display title.
        #[arg(long)]
        title: String,
        /// Parent category.
        #[arg(long)]
        parent_id: Option<i64>,
    },
    /// DELETE /category/:id
    Delete {
        /// Id to delete.
        id: i64,
    },
}

/// Tag commands.
#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// GET /tag
    List {
        /// Case-insensitive title or slug search, applied locally.
        #[arg(long)]
        search: Option<String>,
    },
    /// GET /tag/:id
    Get {
        /// Id to load.
        id: i64,
    },
    /// POST /tag
    Create {
        /// Display title.
        #[arg(long)]
        title: String,
        /// URL slug. Derived from the title when omitted.
        #[arg(long)]
        slug: Option<String>,
    },
    /// PUT /tag
    Update {
        /// Tag to update.
        id: i64,
        /// Display title.
        #[arg(long)]
        title: String,
        /// URL slug.
        #[arg(long)]
        slug: Option<String>,
    },
    /// DELETE /tag/:id
    Delete {
        /// Id to delete.
        id: i64,
    },
    /// Move every article from SOURCE to TARGET and delete SOURCE.
    Merge {
        /// Tag to merge away.
        source: i64,
        /// Tag that receives the articles.
        target: i64,
    },
}
