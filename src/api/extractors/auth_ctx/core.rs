use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

use super::AuthContext;

/// Handler で AuthContext を受け取るための extractor
/// middleware が AuthContext を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す (route に認証が掛かっていない)
pub struct AuthContextExtractor(pub AuthContext);

impl FromRequestParts<AppState> for AuthContextExtractor
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthContextExtractor)
            .ok_or_else(AppError::unauthorized)
    }
}
