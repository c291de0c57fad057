//! Routes called by backend integrations (dispenser event functions).

use crate::api::handlers::{lambda, users};
use crate::middleware::auth::AuthMode;

use super::Route;

pub(super) fn routes() -> Vec<Route> {
    vec![
        Route::post("/dispenser/dispensed", AuthMode::Trusted, lambda::dispensed),
        Route::post("/dispenser/inserted", AuthMode::Trusted, lambda::inserted),
        Route::post("/dispenser/connected", AuthMode::Trusted, lambda::connected),
        Route::post(
            "/dispenser/disconnected",
            AuthMode::Trusted,
            lambda::disconnected,
        ),
        Route::put(
            "/user/{external_id}",
            AuthMode::Trusted,
            users::update_by_external_id,
        ),
    ]
}
