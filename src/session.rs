//! The session context passed to every store operation.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{Error, UserID};

/// Who is acting on the stores.
///
/// An anonymous session may read, and always reads nothing. Mutations and
/// subscriptions require an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    user_id: Option<UserID>,
}

impl Session {
    /// A session acting as `user_id`.
    pub fn authenticated(user_id: UserID) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// A session without a user.
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// The acting user, if any.
    pub fn user_id(&self) -> Option<UserID> {
        self.user_id
    }

    /// Whether a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// The acting user.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] for an anonymous session.
    pub fn require_user(&self) -> Result<UserID, Error> {
        self.user_id.ok_or(Error::Unauthenticated)
    }
}

/// Reads the [UserID] that the auth guard placed in the request extensions.
/// Requests that did not pass through the guard get an anonymous session.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            user_id: parts.extensions.get::<UserID>().copied(),
        })
    }
}
