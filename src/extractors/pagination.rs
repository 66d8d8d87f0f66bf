use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// List query parameters extractor: page, limit and an optional search term.
///
/// Usage in handlers:
/// ```rust,ignore
/// async fn list_jobs(query: ListQuery) -> impl IntoResponse {
///     // query.page, query.limit, query.q, query.offset()
/// }
/// ```
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct ListQuery {
    /// Page number, 1-based (default: 1)
    #[serde(default = "default_page")]
    pub page: u64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Optional search term.
    #[serde(default)]
    pub q: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            page: 1,
            limit: 10,
            q: None,
        }
    }
}

impl ListQuery {
    /// Clamp limit to max 100 and page to at least 1.
    pub fn clamped(self) -> Self {
        ListQuery {
            page: self.page.max(1),
            limit: self.limit.clamp(1, 100),
            q: self.q,
        }
    }

    /// Number of rows to skip for the current page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = crate::error::ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        let list: ListQuery = serde_urlencoded::from_str(query).unwrap_or_default();
        Ok(list.clamped())
    }
}

/// Pagination metadata included alongside list responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(total: u64, query: &ListQuery) -> Self {
        let limit = query.limit.max(1);
        PageMeta {
            total,
            page: query.page,
            limit,
            total_pages: total.div_ceil(limit),
        }
    }
}
