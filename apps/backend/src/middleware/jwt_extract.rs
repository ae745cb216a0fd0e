//! JWT extraction middleware
//!
//! This middleware extracts JWT claims from the Authorization header and stores them
//! in request extensions. It only runs on protected scopes and rejects the
//! request with 401 if no valid claims are found.
//!
//! EventSource connections cannot set headers, so a `?token=` query
//! parameter is accepted as a fallback on the stream routes.

use std::collections::HashMap;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Extract Authorization sources and AppState before moving req
        let auth_header = req.headers().get(header::AUTHORIZATION).cloned();
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        // Parse token from Authorization header or query string fallback (for SSE)
        let token = match extract_bearer_from_header(auth_header.as_ref()) {
            Ok(Some(token)) => token,
            Ok(None) => match extract_token_from_query(req.uri().query()) {
                Some(token) => token,
                None => {
                    return Box::pin(async {
                        Err(AppError::unauthorized_missing_bearer().into())
                    })
                }
            },
            Err(err) => {
                return Box::pin(async move { Err(err.into()) });
            }
        };

        // Get AppState - must be available
        let app_state = match app_state {
            Some(state) => state,
            None => {
                return Box::pin(async {
                    Err(AppError::internal("AppState not available").into())
                });
            }
        };

        // Verify the JWT token
        match verify_access_token(&token, &app_state.security) {
            Ok(claims) => {
                // Store claims in request extensions BEFORE calling the service
                req.extensions_mut().insert(claims);

                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(err) => Box::pin(async move { Err(err.into()) }),
        }
    }
}

fn extract_bearer_from_header(
    header_value: Option<&actix_web::http::header::HeaderValue>,
) -> Result<Option<String>, AppError> {
    let auth_value = match header_value {
        Some(value) => value,
        None => return Ok(None),
    };

    let auth_str = auth_value
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AppError::unauthorized_missing_bearer());
    }

    let token_str = parts[1];
    if token_str.is_empty() {
        return Err(AppError::unauthorized_missing_bearer());
    }

    Ok(Some(token_str.to_string()))
}

fn extract_token_from_query(query: Option<&str>) -> Option<String> {
    let query_str = query?;
    let params = web::Query::<HashMap<String, String>>::from_query(query_str).ok()?;
    params
        .get("token")
        .cloned()
        .filter(|value| !value.is_empty())
}
