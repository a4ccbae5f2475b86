use nnews_shared::{Category, CategoryInput, CategoryUpdate, NewsResult};
use reqwest::Method;

use super::{endpoints, push_roles};
use crate::{
    http::HttpClient,
    wire::{normalize_all, CategoryRecord},
};

/// Category endpoints.
#[derive(Clone)]
pub struct CategoryApi {
    http: HttpClient,
}

impl CategoryApi {
    /// Client over a shared [`HttpClient`].
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
        }
    }

    /// `GET /category`: every category.
    pub async fn list_categories(&self) -> NewsResult<Vec<Category>> {
        let records: Vec<CategoryRecord> = self.http.get(endpoints::CATEGORIES, Vec::new()).await?;
        normalize_all(records)
    }

    /// `GET /category/filter`. Empty `roles` and a missing `parent_id` are
    /// left out of the query.
    pub async fn filter_categories(
        &self,
        roles: &[String],
        parent_id: Option<i64>,
    ) -> NewsResult<Vec<Category>> {
        let mut query = Vec::new();
        push_roles(&mut query, roles);
        if let Some(parent_id) = parent_id {
            query.push(("parentId".to_string(), parent_id.to_string()));
        }

        let records: Vec<CategoryRecord> =
            self.http.get(endpoints::CATEGORIES_FILTER, query).await?;
        normalize_all(records)
    }

    /// `GET /category/{id}`.
    pub async fn get_category(&self, category_id: i64) -> NewsResult<Category> {
        let record: CategoryRecord = self
            .http
            .get(&endpoints::category_by_id(category_id), Vec::new())
            .await?;
        Category::try_from(record)
    }

    /// Validate, then `POST /category`.
    pub async fn create_category(&self, category: &CategoryInput) -> NewsResult<Category> {
        category.validate()?;
        let record: CategoryRecord = self
            .http
            .send_json(Method::POST, endpoints::CATEGORIES, category)
            .await?;
        let created = Category::try_from(record)?;
        tracing::info!(category_id = created.category_id, title = %created.title, "category created");
        Ok(created)
    }

    /// Validate, then `PUT /category`.
    pub async fn update_category(&self, category: &CategoryUpdate) -> NewsResult<Category> {
        category.validate()?;
        let record: CategoryRecord = self
            .http
            .send_json(Method::PUT, endpoints::CATEGORIES, category)
            .await?;
        tracing::info!(category_id = category.category_id, "category updated");
        Category::try_from(record)
    }

    /// `DELETE /category/{id}`.
    pub async fn delete_category(&self, category_id: i64) -> NewsResult<()> {
        self.http
            .send_empty(Method::DELETE, &endpoints::category_by_id(category_id))
            .await?;
        tracing::info!(category_id, "category deleted");
        Ok(())
    }
}
