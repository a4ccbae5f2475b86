//! Shared building blocks for the NNews client workspace.
//!
//! This crate holds everything that does not need a network: the article,
//! category and tag model, the error type every layer reports with, form
//! validators, client-side pagination and markdown preview rendering.

pub mod error;
pub mod models;
pub mod pagination;
pub mod preview;
pub mod validators;

pub use error::{NewsError, NewsResult};
pub use models::{
    AiArticleRequest, Article, ArticleInput, ArticleQuery, ArticleStatus, ArticleUpdate, Category,
    CategoryInput, CategoryQuery, CategoryUpdate, PagedResult, Role, Tag, TagInput, TagQuery,
    TagUpdate,
};
