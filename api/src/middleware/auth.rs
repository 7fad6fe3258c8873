//! Bearer authentication middleware for protected endpoints.
//!
//! The middleware runs the token service's bearer authentication (header
//! parsing, blacklist lookup, signature and expiry check) and injects an
//! [`AuthContext`] into the request extensions for handlers to extract.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use auth_core::domain::entities::token::SignedToken;
use auth_core::errors::{AuthError, DomainError};
use futures_util::future::LocalBoxFuture;

use crate::app::AppState;
use crate::handlers::error::{handle_domain_error, ApiError};

/// Authenticated caller, available to handlers behind [`JwtAuth`]
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User id from the `sub` claim
    pub subject: String,
    /// The presented access token, needed to revoke it on logout
    pub token: SignedToken,
}

impl From<SignedToken> for AuthContext {
    fn from(token: SignedToken) -> Self {
        Self {
            subject: token.claims.sub.clone(),
            token,
        }
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let authorization = authorization_header(&req);

        Box::pin(async move {
            let authenticated = match state {
                Some(state) => state.token_service.authenticate(authorization.as_deref()).await,
                None => Err(DomainError::Internal {
                    message: "Token service is not configured".to_string(),
                }),
            };

            let token = match authenticated {
                Ok(token) => token,
                Err(error) => {
                    let response = handle_domain_error(&error);
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(AuthContext::from(token));

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Raw `Authorization` header; non-ASCII values count as absent
fn authorization_header(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .map(str::to_owned)
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result: Result<Self, Self::Error> = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError(AuthError::NoAuthorizationHeader.into()).into());

        ready(result)
    }
}
