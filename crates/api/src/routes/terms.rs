//! Academic term endpoints.

use axum::extract::State;
use axum::Form;
use domain::models::term::{AddTermRequest, DeleteTermForm, ModifyTermRequest, NewTerm, TermItem};
use domain::models::Term;
use persistence::repositories::TermRepository;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppQuery};
use crate::response::{ApiResponse, ApiResult, EmptyResult};

#[derive(Debug, Deserialize)]
pub struct TermIdQuery {
    pub id: Option<i64>,
}

/// GET /admin/term/getAllTerm
pub async fn list_terms(State(state): State<AppState>) -> ApiResult<Vec<TermItem>> {
    let repo = TermRepository::new(state.pool.clone());
    let terms = repo
        .list()
        .await?
        .into_iter()
        .map(|entity| TermItem::from(Term::from(entity)))
        .collect();
    Ok(ApiResponse::ok(terms))
}

/// PUT /admin/term/addTerm
pub async fn add_term(
    State(state): State<AppState>,
    AppJson(request): AppJson<AddTermRequest>,
) -> EmptyResult {
    let (term, start_date) = request
        .parse()
        .ok_or_else(|| ApiError::param("startDate must be YYYY-MM-DD"))?;
    if term.trim().is_empty() {
        return Err(ApiError::param("term must not be blank"));
    }

    let repo = TermRepository::new(state.pool.clone());
    repo.insert(&NewTerm {
        id: state.ids.next_id(),
        term: term.trim().to_string(),
        start_date,
    })
    .await?;

    Ok(ApiResponse::empty())
}

/// PATCH /admin/term/chTerm
pub async fn modify_term(
    State(state): State<AppState>,
    AppJson(request): AppJson<ModifyTermRequest>,
) -> EmptyResult {
    if request.id <= 0 {
        return Err(ApiError::IdRequired);
    }
    let (id, changes) = request
        .into_changes()
        .ok_or_else(|| ApiError::param("startDate must be YYYY-MM-DD"))?;

    let repo = TermRepository::new(state.pool.clone());
    if repo.update(id, &changes).await? == 0 {
        return Err(ApiError::InvalidId);
    }

    Ok(ApiResponse::empty())
}

/// DELETE /admin/term/deleteTerm
///
/// The id comes from the query string or a urlencoded form body.
pub async fn delete_term(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TermIdQuery>,
    form: Option<Form<DeleteTermForm>>,
) -> EmptyResult {
    let id = query
        .id
        .or(form.map(|Form(f)| f.id))
        .filter(|id| *id > 0)
        .ok_or(ApiError::IdRequired)?;

    let repo = TermRepository::new(state.pool.clone());
    if !repo.exists(id).await? {
        return Err(ApiError::InvalidId);
    }
    repo.soft_delete(id).await?;

    Ok(ApiResponse::empty())
}
