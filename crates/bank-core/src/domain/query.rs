// ============================================================================
// Bank Core - Account Listing Query
// File: crates/bank-core/src/domain/query.rs
// Description: Normalised filter, sort and pagination parameters for listings
// ============================================================================

use bank_shared::Pagination;
use serde::{Deserialize, Serialize};

use super::{AccountStatus, AccountType};
use crate::error::{DomainError, FieldErrors};
use crate::validation::push_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    OpenedAt,
    Balance,
    Holder,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::OpenedAt => "dateCreation",
            SortField::Balance => "solde",
            SortField::Holder => "titulaire",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "dateCreation" => Some(SortField::OpenedAt),
            "solde" => Some(SortField::Balance),
            "titulaire" => Some(SortField::Holder),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilters {
    pub account_type: Option<AccountType>,
    pub status: Option<AccountStatus>,
    /// Trimmed, never blank
    pub search: Option<String>,
}

/// Raw listing parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAccountsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(rename = "statut", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

/// Validated listing query. Soft-deleted accounts are excluded unless
/// [`AccountQuery::including_deleted`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    pub filters: AccountFilters,
    pub sort: SortField,
    pub order: SortOrder,
    pub pagination: Pagination,
    include_deleted: bool,
}

impl Default for AccountQuery {
    fn default() -> Self {
        Self {
            filters: AccountFilters::default(),
            sort: SortField::default(),
            order: SortOrder::default(),
            pagination: Pagination::default(),
            include_deleted: false,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn to_page_number(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

impl AccountQuery {
    pub fn parse(params: &ListAccountsParams) -> Result<Self, DomainError> {
        let mut errors = FieldErrors::new();
        let mut query = AccountQuery::default();

        if let Some(raw) = non_blank(&params.account_type) {
            match AccountType::from_str(raw) {
                Some(t) => query.filters.account_type = Some(t),
                None => push_error(
                    &mut errors,
                    "",
                    "account_type",
                    "Le type doit être courant, cheque ou epargne.",
                ),
            }
        }

        if let Some(raw) = non_blank(&params.status) {
            match AccountStatus::from_str(raw) {
                Some(s) => query.filters.status = Some(s),
                None => push_error(
                    &mut errors,
                    "",
                    "statut",
                    "Le statut doit être actif, bloque ou ferme.",
                ),
            }
        }

        query.filters.search = non_blank(&params.search).map(str::to_string);

        if let Some(raw) = non_blank(&params.sort) {
            match SortField::from_str(raw) {
                Some(s) => query.sort = s,
                None => push_error(
                    &mut errors,
                    "",
                    "sort",
                    "Le tri doit être dateCreation, solde ou titulaire.",
                ),
            }
        }

        if let Some(raw) = non_blank(&params.order) {
            match SortOrder::from_str(raw) {
                Some(o) => query.order = o,
                None => push_error(&mut errors, "", "order", "L'ordre doit être asc ou desc."),
            }
        }

        query.pagination = Pagination::new(
            params.page.map(to_page_number),
            params.limit.map(to_page_number),
        );

        if !errors.is_empty() {
            return Err(DomainError::validation(
                "Les paramètres de recherche sont invalides.",
                errors,
            ));
        }
        Ok(query)
    }

    /// Lifts the soft-delete exclusion.
    pub fn including_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    pub fn includes_deleted(&self) -> bool {
        self.include_deleted
    }
}
