use actix_web::web;

use crate::middleware::jwt_extract::JwtExtract;

pub mod automatch;
pub mod health;
pub mod matches;
pub mod transfers;

/// Configure application routes.
///
/// `main.rs` and the test app builders both go through this function, so
/// the paths and the per-scope auth middleware are always the same in
/// production and under test. Everything except `/health` sits behind
/// [`JwtExtract`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health (unauthenticated)
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Automatch routes: /automatch/**
    cfg.service(
        web::scope("/automatch")
            .wrap(JwtExtract)
            .configure(automatch::configure_routes),
    );

    // Match routes: /match/**. The literal /transfer resources are
    // registered ahead of the dynamic /{match_id} ones; actix matches
    // resources in registration order.
    cfg.service(
        web::scope("/match")
            .wrap(JwtExtract)
            .configure(transfers::configure_routes)
            .configure(matches::configure_routes),
    );
}
