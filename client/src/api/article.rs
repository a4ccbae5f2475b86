use nnews_shared::{
    validators::validate_prompt, AiArticleRequest, Article, ArticleInput, ArticleUpdate,
    NewsError, NewsResult, PagedResult,
};
use reqwest::Method;

use super::{endpoints, push_page, push_roles, ImageUpload};
use crate::{
    http::HttpClient,
    wire::{ArticleRecord, PagedRecord},
};

/// Article endpoints, including image upload and AI generation.
#[derive(Clone)]
pub struct ArticleApi {
    http: HttpClient,
}

impl ArticleApi {
    /// Client over a shared [`HttpClient`].
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
        }
    }

    /// Upload an image and return the reference the server stored it under.
    ///
    /// The server answers with either a JSON string or plain text; both are
    /// accepted.
    pub async fn upload_image(&self, image: ImageUpload) -> NewsResult<String> {
        image.validate()?;
        tracing::debug!(
            file_name = %image.file_name,
            size = image.bytes.len(),
            "uploading article image"
        );

        let body = self
            .http
            .upload(endpoints::IMAGE_UPLOAD, image.into_file_part())
            .await?;
        let reference = serde_json::from_slice::<String>(&body)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        let reference = reference.trim().to_string();
        if reference.is_empty() {
            return Err(NewsError::Decode("image upload returned an empty reference".to_string()));
        }
        Ok(reference)
    }

    /// `GET /article`. `category_id` is only sent when present and non-zero.
    pub async fn list_articles(
        &self,
        category_id: Option<i64>,
        page: u32,
        page_size: u32,
    ) -> NewsResult<PagedResult<Article>> {
        let mut query = Vec::new();
        push_page(&mut query, page, page_size);
        if let Some(category_id) = category_id.filter(|id| *id != 0) {
            query.push(("categoryId".to_string(), category_id.to_string()));
        }

        let page: PagedRecord<ArticleRecord> = self.http.get(endpoints::ARTICLES, query).await?;
        page.normalize()
    }

    /// `GET /article/filter`, restricted to `roles` and/or a parent category.
    pub async fn filter_articles(
        &self,
        roles: &[String],
        parent_id: Option<i64>,
        page: u32,
        page_size: u32,
    ) -> NewsResult<PagedResult<Article>> {
        let mut query = Vec::new();
        push_roles(&mut query, roles);
        if let Some(parent_id) = parent_id {
            query.push(("parentId".to_string(), parent_id.to_string()));
        }
        push_page(&mut query, page, page_size);

        let page: PagedRecord<ArticleRecord> =
            self.http.get(endpoints::ARTICLES_FILTER, query).await?;
        page.normalize()
    }

    /// `GET /article/{id}`.
    pub async fn get_article(&self, article_id: i64) -> NewsResult<Article> {
        let record: ArticleRecord = self
            .http
            .get(&endpoints::article_by_id(article_id), Vec::new())
            .await?;
        Article::try_from(record)
    }

    /// Validate, then `POST /article`.
    pub async fn create_article(&self, article: &ArticleInput) -> NewsResult<Article> {
        article.validate()?;
        let record: ArticleRecord = self
            .http
            .send_json(Method::POST, endpoints::ARTICLES, article)
            .await?;
        let created = Article::try_from(record)?;
        tracing::info!(article_id = created.article_id, "article created");
        Ok(created)
    }

    /// Validate, then `PUT /article`. The id travels in the body.
    pub async fn update_article(&self, article: &ArticleUpdate) -> NewsResult<Article> {
        article.validate()?;
        let record: ArticleRecord = self
            .http
            .send_json(Method::PUT, endpoints::ARTICLES, article)
            .await?;
        tracing::info!(article_id = article.article_id, "article updated");
        Article::try_from(record)
    }

    /// `DELETE /article/{id}`.
    pub async fn delete_article(&self, article_id: i64) -> NewsResult<()> {
        self.http
            .send_empty(Method::DELETE, &endpoints::article_by_id(article_id))
            .await?;
        tracing::info!(article_id, "article deleted");
        Ok(())
    }

    /// `POST /article/insertWithAI`: the server writes a new article from
    /// the prompt.
    pub async fn create_article_with_ai(&self, request: &AiArticleRequest) -> NewsResult<Article> {
        validate_prompt(&request.prompt)?;
        let record: ArticleRecord = self
            .http
            .send_json(Method::POST, endpoints::ARTICLES_AI_INSERT, request)
            .await?;
        let created = Article::try_from(record)?;
        tracing::info!(article_id = created.article_id, "article generated with ai");
        Ok(created)
    }

    /// `PUT /article/updateWithAI`: rewrite an existing article. The
    /// request must carry the article id.
    pub async fn update_article_with_ai(&self, request: &AiArticleRequest) -> NewsResult<Article> {
        let Some(article_id) = request.article_id else {
            return Err(NewsError::validation("Article ID is required for update mode"));
        };
        validate_prompt(&request.prompt)?;
        let record: ArticleRecord = self
            .http
            .send_json(Method::PUT, endpoints::ARTICLES_AI_UPDATE, request)
            .await?;
        tracing::info!(article_id, "article regenerated with ai");
        Article::try_from(record)
    }
}
