/*
 * Responsibility
 * - ?limit=&page= の解釈 (default 25 / 0)
 * - storage 用の Page (LIMIT / OFFSET) と、response の next / previous link 生成
 */
use axum::extract::{FromRequestParts, Query};
use axum::http::{header, request::Parts};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::repos::Page;

pub const DEFAULT_LIMIT: u32 = 25;

#[derive(Debug, Deserialize)]
struct PageQuery {
    limit: Option<u32>,
    page: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct Pagination {
    pub limit: u32,
    pub page: u32,
    base: String,
}

#[derive(Debug, Serialize)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageLinks,
}

impl Pagination {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.page.saturating_mul(self.limit))
    }

    fn link(&self, page: u32) -> String {
        format!("{}?limit={}&page={}", self.base, self.limit, page)
    }

    /// `previous` only past the first page, `next` only when this page came back full.
    pub fn wrap<T>(&self, data: Vec<T>) -> Paginated<T> {
        let previous = (self.page > 0).then(|| self.link(self.page - 1));
        let next = (data.len() == self.limit as usize).then(|| self.link(self.page + 1));

        Paginated {
            data,
            pagination: PageLinks { next, previous },
        }
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        Ok(Self {
            limit: query.limit.unwrap_or(DEFAULT_LIMIT).max(1),
            page: query.page.unwrap_or(0),
            base: format!("{}{}", host, parts.uri.path()),
        })
    }
}
