//! `Authorization: Bearer <token>` extractor.

use axum::extract::FromRequestParts;
use http::{HeaderMap, header::AUTHORIZATION, request::Parts};

use crate::error::AccountsServiceError;

/// Raw session token taken from the `Authorization` header.
///
/// Only the header shape is checked here; resolving it to a user is
/// `ResolveUserUseCase`'s job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

fn parse_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AccountsServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parse_bearer(&parts.headers);
        async move { token.map(Self).ok_or(AccountsServiceError::InvalidToken) }
    }
}
