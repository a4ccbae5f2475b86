//! Typed client for the NNews content API.
//!
//! A [`NewsContext`] owns one [`HttpClient`] and the three resource APIs
//! built on it. Stores ([`ArticleStore`], [`CategoryStore`], [`TagStore`])
//! keep the last fetched list together with loading/error state and reload
//! it with the last-used query after every mutation. The generator, merge
//! and editor modules model the multi-step flows that sit on top of the
//! stores.
//!
//! ```no_run
//! use nnews_client::{NewsConfig, NewsContext};
//! use nnews_shared::{TagInput, TagQuery};
//!
//! # async fn demo() -> nnews_shared::NewsResult<()> {
//! let context = NewsContext::new(NewsConfig::from_env())?;
//! let tags = context.tag_store();
//! tags.fetch(TagQuery::default()).await?;
//! tags.create(&TagInput::new("Tech")).await?;
//! assert!(tags.tags().iter().any(|tag| tag.title == "Tech"));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod context;
pub mod editor;
pub mod generator;
pub mod http;
pub mod merge;
pub mod store;
mod wire;

pub use api::{ArticleApi, CategoryApi, ImageUpload, TagApi};
pub use config::NewsConfig;
pub use context::NewsContext;
pub use editor::{ArticleEditor, ArticleSubmission, EditorField, RoleOption, RoleSource};
pub use generator::{ArticleGenerator, GenerationMode, GenerationProgress};
pub use http::{ApiRequest, ApiResponse, FilePart, HttpClient, RequestBody, ReqwestTransport, Transport};
pub use merge::TagMerge;
pub use nnews_shared::{NewsError, NewsResult};
pub use store::{ArticleStore, CategoryStore, TagStore};
pub use wire::parse_datetime;
