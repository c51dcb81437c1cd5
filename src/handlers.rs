use crate::{
    AppState,
    error::{ApiError, RepositoryError},
    models::{Person, ProblemDetails},
    routes::PEOPLE_PATH,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::Value;
use uuid::Uuid;

/// Location of a single person, as returned in the `Location` header on create.
pub fn person_location(id: Uuid) -> String {
    format!("{}/{}", PEOPLE_PATH, id)
}

/// Body id of a replace request, read before the rest of the payload is validated.
/// An absent id is nil, matching `Person`'s deserialization.
fn body_id(body: &Value) -> Result<Uuid, ApiError> {
    match body.get("id") {
        None | Some(Value::Null) => Ok(Uuid::nil()),
        Some(Value::String(raw)) => Uuid::parse_str(raw)
            .map_err(|e| ApiError::BadRequest(format!("invalid body id: {}", e))),
        Some(other) => Err(ApiError::BadRequest(format!("invalid body id: {}", other))),
    }
}

/// Reads treat a missing entity set the same as a missing record.
fn unavailable_as_not_found(err: RepositoryError) -> ApiError {
    if err.is_unavailable() {
        ApiError::NotFound
    } else {
        err.into()
    }
}

/// list_people
///
/// [Admin, Contributor, Reader] Lists every person in storage order.
#[utoipa::path(
    get,
    path = "/api/People",
    responses(
        (status = 200, description = "All people", body = [Person]),
        (status = 404, description = "People store unavailable", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_people(State(state): State<AppState>) -> Result<Json<Vec<Person>>, ApiError> {
    let people = state
        .repo
        .list_people()
        .await
        .map_err(unavailable_as_not_found)?;
    Ok(Json(people))
}

/// get_person
///
/// [Admin, Contributor, Reader] Retrieves a single person by id.
#[utoipa::path(
    get,
    path = "/api/People/{id}",
    params(("id" = Uuid, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Found", body = Person),
        (status = 404, description = "Not Found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError> {
    match state
        .repo
        .find_person(id)
        .await
        .map_err(unavailable_as_not_found)?
    {
        Some(person) => Ok(Json(person)),
        None => Err(ApiError::NotFound),
    }
}

/// update_person
///
/// [Admin, Contributor] Replaces the whole record stored under `id`.
///
/// The path and body ids are compared before the payload is validated, so a mismatch
/// is a 400 whatever else the body contains. The write goes first. When it affects nothing, existence is re-checked to tell a
/// deleted record (404) apart from one that changed underneath us (409).
#[utoipa::path(
    put,
    path = "/api/People/{id}",
    params(("id" = Uuid, Path, description = "Person ID")),
    request_body = Person,
    responses(
        (status = 204, description = "Replaced"),
        (status = 400, description = "Path and body ids differ, or invalid payload", body = ProblemDetails),
        (status = 404, description = "Not Found", body = ProblemDetails),
        (status = 409, description = "Concurrent modification", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = payload?;
    let body_id = body_id(&body)?;
    if id != body_id {
        return Err(ApiError::BadRequest(format!(
            "path id {} does not match body id {}",
            id, body_id
        )));
    }
    let person: Person = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid person: {}", e)))?;

    match state.repo.update_person(&person).await {
        Ok(()) => {
            tracing::info!(person_id = %id, "person replaced");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(RepositoryError::Concurrency(_)) => {
            let exists = match state.repo.person_exists(id).await {
                Ok(exists) => exists,
                Err(RepositoryError::Unavailable) => false,
                Err(e) => return Err(e.into()),
            };
            if !exists {
                return Err(ApiError::NotFound);
            }
            tracing::warn!(person_id = %id, "update conflict on existing person");
            Err(ApiError::Conflict(format!(
                "person {} was modified concurrently",
                id
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// create_person
///
/// [Admin, Contributor] Inserts a new person. A client-supplied id is kept; an absent
/// or nil id is replaced with a fresh one. Responds 201 with a `Location` header
/// pointing at the get-by-id route.
#[utoipa::path(
    post,
    path = "/api/People",
    request_body = Person,
    responses(
        (status = 201, description = "Created", body = Person),
        (status = 400, description = "Invalid payload", body = ProblemDetails),
        (status = 409, description = "Id already taken", body = ProblemDetails),
        (status = 500, description = "People store unavailable", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<Person>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(person) = payload?;
    let created = state
        .repo
        .insert_person(person.with_assigned_id())
        .await?;

    tracing::info!(person_id = %created.id, "person created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, person_location(created.id))],
        Json(created),
    ))
}

/// delete_person
///
/// [Admin] Removes a person. Looks the record up first so that an absent id is a 404.
#[utoipa::path(
    delete,
    path = "/api/People/{id}",
    params(("id" = Uuid, Path, description = "Person ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let found = state
        .repo
        .find_person(id)
        .await
        .map_err(unavailable_as_not_found)?;
    if found.is_none() {
        return Err(ApiError::NotFound);
    }

    // Someone else may have removed it between the read and the write.
    if !state.repo.delete_person(id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(person_id = %id, "person deleted");
    Ok(StatusCode::NO_CONTENT)
}
