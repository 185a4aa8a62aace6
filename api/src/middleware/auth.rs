//! Cookie session gate for protected endpoints
//!
//! Reads the access token from its cookie and verifies it. An expired but
//! authentic access token triggers exactly one silent rotation, using the
//! refresh cookie or, when that is absent, the session's live refresh
//! record. The rotated pair is re-set on the response. Every other failure
//! answers 401 and clears both cookies.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::{debug, error, info};
use uuid::Uuid;

use parley_core::{DomainError, TokenError, TokenPair, TokenPayload, TokenRepository, TokenService};
use parley_shared::errors::{error_codes, ErrorResponse};

use crate::cookies::AuthCookies;
use crate::handlers::error_body;

/// Identity of an authenticated request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub session_id: Uuid,
    /// Identifier of the access token that authenticated the request
    pub token_id: Uuid,
}

impl From<TokenPayload> for AuthContext {
    fn from(payload: TokenPayload) -> Self {
        Self {
            user_id: payload.user_id,
            session_id: payload.session_id,
            token_id: payload.token_id,
        }
    }
}

/// Cookie authentication middleware factory
pub struct CookieAuth<R: TokenRepository> {
    token_service: Arc<TokenService<R>>,
    cookies: AuthCookies,
}

impl<R: TokenRepository> CookieAuth<R> {
    pub fn new(token_service: Arc<TokenService<R>>, cookies: AuthCookies) -> Self {
        Self {
            token_service,
            cookies,
        }
    }
}

impl<R: TokenRepository> Clone for CookieAuth<R> {
    fn clone(&self) -> Self {
        Self {
            token_service: Arc::clone(&self.token_service),
            cookies: self.cookies.clone(),
        }
    }
}

impl<S, B, R> Transform<S, ServiceRequest> for CookieAuth<R>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    R: TokenRepository + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CookieAuthMiddleware<S, R>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CookieAuthMiddleware {
            service: Rc::new(service),
            token_service: Arc::clone(&self.token_service),
            cookies: self.cookies.clone(),
        }))
    }
}

/// Cookie authentication middleware service
pub struct CookieAuthMiddleware<S, R: TokenRepository> {
    service: Rc<S>,
    token_service: Arc<TokenService<R>>,
    cookies: AuthCookies,
}

impl<S, B, R> Service<ServiceRequest> for CookieAuthMiddleware<S, R>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    R: TokenRepository + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let token_service = Arc::clone(&self.token_service);
        let cookies = self.cookies.clone();

        Box::pin(async move {
            let access_token = AuthCookies::read_access(req.request());
            let refresh_token = AuthCookies::read_refresh(req.request());

            let (context, rotated) = match authenticate(
                &token_service,
                access_token.as_deref(),
                refresh_token.as_deref(),
            )
            .await
            {
                Ok(authenticated) => authenticated,
                Err(error) => {
                    debug!(path = %req.path(), error = %error, "request rejected by session gate");
                    let response = reject(&error, &cookies);
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(context);
            let mut response = service.call(req).await?;

            if let Some(pair) = rotated {
                for cookie in cookies.issue(&pair) {
                    response.response_mut().add_cookie(&cookie)?;
                }
            }

            Ok(response.map_into_left_body())
        })
    }
}

/// Verify the access token, rotating once if it has expired
async fn authenticate<R: TokenRepository>(
    token_service: &TokenService<R>,
    access_token: Option<&str>,
    refresh_token: Option<&str>,
) -> Result<(AuthContext, Option<TokenPair>), DomainError> {
    let access_token = access_token.ok_or(TokenError::InvalidAccessToken)?;

    match token_service.verify_token(access_token) {
        Ok(payload) => Ok((payload.into(), None)),
        Err(error) if error.is_access_expired() => {
            let pair = rotate_session(token_service, access_token, refresh_token).await?;
            let payload = token_service.verify_token(&pair.access_token)?;
            info!(session_id = %pair.session_id, "expired access token silently rotated");
            Ok((payload.into(), Some(pair)))
        }
        Err(error) => Err(error),
    }
}

/// Rotate the session named by `access_token`
///
/// Without a refresh cookie the session's live refresh record stands in
/// for it. The access token must still be authentic for that lookup.
pub async fn rotate_session<R: TokenRepository>(
    token_service: &TokenService<R>,
    access_token: &str,
    refresh_token: Option<&str>,
) -> Result<TokenPair, DomainError> {
    let refresh_token = match refresh_token {
        Some(token) => token.to_string(),
        None => {
            let claims = token_service.extract_claims(access_token)?;
            token_service.get_token_by_session(claims.session_id).await?
        }
    };

    token_service.rotate_tokens(access_token, &refresh_token).await
}

/// 401 that forces the client to authenticate again
fn reject(error: &DomainError, cookies: &AuthCookies) -> HttpResponse {
    let body = match error {
        DomainError::Token(_) => error_body(error).1,
        other => {
            error!(error = %other, "session gate failed");
            ErrorResponse::new(error_codes::UNAUTHORIZED, "Unauthorized")
        }
    };

    let mut response = HttpResponse::Unauthorized();
    cookies.clear_all(&mut response);
    response.json(body)
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .copied()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
