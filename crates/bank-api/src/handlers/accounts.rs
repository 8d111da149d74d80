//! `/v1/comptes` handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use bank_core::domain::{AccountQuery, AuthContext, ListAccountsParams};
use bank_shared::constants::API_PREFIX;
use tracing::info;
use uuid::Uuid;

use crate::dto::{
    pagination_links, AccountResource, ClosedAccountResource, CreateAccountRequest,
    UpdateAccountRequest,
};
use crate::error::ApiError;
use crate::extract::{extract_account_id, extract_json, extract_query};
use crate::response::{ApiResponse, PaginatedResponse};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListAccountsParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let params = extract_query(query)?;
    let query = AccountQuery::parse(&params)?;

    let page = state.account_queries.list(&query).await?;
    let links = pagination_links(&format!("{}/comptes", API_PREFIX), &params, &page);
    let page = page.map(AccountResource::from);

    Ok(Json(PaginatedResponse::new(
        page,
        links,
        "Comptes récupérés avec succès",
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = extract_json(body)?;
    let view = state.accounts.create(req.into()).await?;
    info!(
        account_id = %view.account.id,
        created_by = %ctx.principal_id,
        "Account created via API"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            AccountResource::from(view),
            "Compte créé avec succès",
        )),
    ))
}

pub async fn show(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = extract_account_id(path)?;
    let view = state.accounts.get(&id).await?;

    Ok(Json(ApiResponse::success(
        AccountResource::from(view),
        "Compte récupéré avec succès",
    )))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = extract_account_id(path)?;
    let req = extract_json(body)?;
    let view = state.accounts.update_client_info(&id, req.into()).await?;

    Ok(Json(ApiResponse::success(
        AccountResource::from(view),
        "Compte mis à jour avec succès",
    )))
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = extract_account_id(path)?;
    let closed = state.accounts.delete(&id).await?;
    info!(account_id = %closed.id, closed_by = %ctx.principal_id, "Account closed via API");

    Ok(Json(ApiResponse::success(
        ClosedAccountResource::from(closed),
        "Compte supprimé avec succès",
    )))
}
