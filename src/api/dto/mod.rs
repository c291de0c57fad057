/*
 * Responsibility
 * - entity 以外の request / response 形 (event message, voice envelope, 作成 request)
 */
pub mod invitations;
pub mod lambda;
pub mod users;
pub mod voice;
