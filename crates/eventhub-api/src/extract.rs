//! Acting-identity extraction from request headers.
//!
//! The session provider in front of the API forwards the signed-in user as
//! `x-user-id`, `x-user-name`, and `x-user-role`.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use eventhub_core::identity::{Actor, Role};

use crate::error::ErrorBody;

const USER_ID_HEADER: &str = "x-user-id";
const USER_NAME_HEADER: &str = "x-user-name";
const USER_ROLE_HEADER: &str = "x-user-role";

/// The signed-in user making the request.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

/// Why a request carried no usable identity.
#[derive(Debug)]
pub struct IdentityRejection(String);

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        ErrorBody::response(StatusCode::UNAUTHORIZED, "unauthorized", self.0)
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn actor_from(parts: &Parts, id: &str) -> Result<Actor, IdentityRejection> {
    let role = match header(parts, USER_ROLE_HEADER) {
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|e| IdentityRejection(e.to_string()))?,
        None => Role::Attendee,
    };
    let name = header(parts, USER_NAME_HEADER).unwrap_or(id);
    Ok(Actor::new(id, name, role))
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| IdentityRejection(format!("missing {USER_ID_HEADER} header")))?;
        actor_from(parts, id).map(Self)
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for CurrentActor {
    type Rejection = IdentityRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match header(parts, USER_ID_HEADER) {
            Some(id) => actor_from(parts, id).map(|actor| Some(Self(actor))),
            None => Ok(None),
        }
    }
}
