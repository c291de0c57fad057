//! Voice-assistant webhooks, keyed by provider.

use crate::api::handlers::fulfillment;
use crate::middleware::auth::{AuthMode, VoiceProvider};

use super::Route;

pub(super) fn routes() -> Vec<Route> {
    vec![
        Route::post(
            "/google/fulfillment",
            AuthMode::Voice(VoiceProvider::Google),
            fulfillment::google,
        ),
        Route::post(
            "/alexa/fulfillment",
            AuthMode::Voice(VoiceProvider::Alexa),
            fulfillment::alexa,
        ),
    ]
}
