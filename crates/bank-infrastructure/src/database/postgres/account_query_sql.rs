//! SQL composition for account listings
//!
//! The list and count statements share one filter builder so the total always
//! describes the same row set as the page.

use bank_core::domain::{AccountQuery, SortField, SortOrder};
use sqlx::{Postgres, QueryBuilder};

pub const ACCOUNT_VIEW_COLUMNS: &str = r#"
    a.id, a.account_number, a.balance, a.currency, a.account_type,
    a.opened_at, a.status, a.closed_at, a.client_id,
    a.created_at, a.modified_at, a.removed_at,
    c.last_name AS holder_last_name, c.first_name AS holder_first_name"#;

const ACCOUNT_VIEW_FROM: &str = " FROM accounts a JOIN clients c ON c.id = a.client_id";

/// Escapes LIKE wildcards and wraps the term for a substring match.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_filters(builder: &mut QueryBuilder<'static, Postgres>, query: &AccountQuery) {
    let mut conditions = 0usize;
    let mut next_condition = |builder: &mut QueryBuilder<'static, Postgres>| {
        builder.push(if conditions == 0 { " WHERE " } else { " AND " });
        conditions += 1;
    };

    if !query.includes_deleted() {
        next_condition(builder);
        builder.push("a.removed_at IS NULL");
    }

    if let Some(account_type) = query.filters.account_type {
        next_condition(builder);
        builder.push("a.account_type = ").push_bind(account_type.as_str());
    }

    if let Some(status) = query.filters.status {
        next_condition(builder);
        builder.push("a.status = ").push_bind(status.as_str());
    }

    if let Some(search) = &query.filters.search {
        let pattern = like_pattern(search);
        next_condition(builder);
        builder
            .push("(a.account_number ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR c.last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR c.first_name ILIKE ")
            .push_bind(pattern)
            .push(r" ESCAPE '\')");
    }
}

fn push_order(builder: &mut QueryBuilder<'static, Postgres>, query: &AccountQuery) {
    let direction = match query.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };

    builder.push(" ORDER BY ");
    match query.sort {
        SortField::OpenedAt => {
            builder.push("a.opened_at ").push(direction);
        }
        SortField::Balance => {
            builder.push("a.balance ").push(direction);
        }
        SortField::Holder => {
            builder
                .push("c.last_name ")
                .push(direction)
                .push(", c.first_name ")
                .push(direction);
        }
    }
    builder.push(", a.id ASC");
}

/// One page of account views.
pub fn list_query(query: &AccountQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT");
    builder.push(ACCOUNT_VIEW_COLUMNS).push(ACCOUNT_VIEW_FROM);
    push_filters(&mut builder, query);
    push_order(&mut builder, query);
    builder
        .push(" LIMIT ")
        .push_bind(query.pagination.limit())
        .push(" OFFSET ")
        .push_bind(query.pagination.offset());
    builder
}

/// Number of rows matching the same filters.
pub fn count_query(query: &AccountQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*)");
    builder.push(ACCOUNT_VIEW_FROM);
    push_filters(&mut builder, query);
    builder
}
