//! API response envelope

use bank_core::FieldErrors;
use bank_shared::Page;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> From<&Page<T>> for PaginationMeta {
    fn from(page: &Page<T>) -> Self {
        Self {
            current_page: page.current_page,
            total_pages: page.last_page(),
            total_items: page.total,
            items_per_page: page.per_page,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PaginationLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub next: Option<String>,
    pub first: String,
    pub last: String,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
    pub links: PaginationLinks,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(page: Page<T>, links: PaginationLinks, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            pagination: PaginationMeta::from(&page),
            data: page.items,
            links,
        }
    }
}
