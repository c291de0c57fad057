//! Self-service routes. The caller's own account / user comes from the token
//! claims; each route names the scope the claims must grant.

use crate::api::handlers::{
    accounts, connections, dispensers, invitations, regimens, reminders, usages, users,
};
use crate::middleware::auth::AuthMode;

use super::Route;

const fn scope(name: &'static str) -> AuthMode {
    AuthMode::implicit(name)
}

pub(super) fn routes() -> Vec<Route> {
    vec![
        // account
        Route::get("/account", scope("account.info"), accounts::show_own),
        Route::put("/account", scope("account.update"), accounts::update_own),
        Route::get("/account/users", scope("account.users"), users::list_account),
        Route::get(
            "/account/users/{user_id}",
            scope("account.user"),
            users::show_account,
        ),
        Route::put(
            "/account/users/{user_id}",
            scope("account.update.user"),
            users::update_account,
        ),
        Route::post(
            "/account/users",
            scope("account.create.users"),
            users::create_account,
        ),
        Route::delete(
            "/account/users/{user_id}",
            scope("account.delete.users"),
            users::delete_account,
        ),
        // user
        Route::get("/user", scope("user.info"), users::show_self),
        Route::put("/user", scope("user.update"), users::update_self),
        // connections
        Route::get(
            "/account/connections",
            scope("account.connections"),
            connections::list,
        ),
        Route::get(
            "/account/connection/{connection_id}",
            scope("account.connection"),
            connections::show,
        ),
        Route::put(
            "/account/connection/{connection_id}",
            scope("account.update.connection"),
            connections::update,
        ),
        Route::delete(
            "/account/connection/{connection_id}",
            scope("account.delete.connection"),
            connections::remove,
        ),
        // dispensers
        Route::get(
            "/account/dispensers",
            scope("account.dispensers"),
            dispensers::list,
        ),
        Route::get(
            "/account/dispensers/{dispenser_id}",
            scope("account.dispenser"),
            dispensers::show,
        ),
        Route::put(
            "/account/dispensers/{dispenser_id}",
            scope("account.update.dispenser"),
            dispensers::update,
        ),
        Route::delete(
            "/account/dispensers",
            scope("account.delete.dispenser"),
            dispensers::remove_first,
        ),
        // usages
        Route::get("/account/usages", scope("account.usages"), usages::list_account),
        Route::get(
            "/account/usages/{usage_id}",
            scope("account.usage"),
            usages::show_account,
        ),
        Route::put(
            "/account/usages/{usage_id}",
            scope("account.update.usage"),
            usages::update_account,
        ),
        Route::get("/user/usages", scope("user.usages"), usages::list_user),
        Route::get(
            "/user/usages/{usage_id}",
            scope("user.usage"),
            usages::show_user,
        ),
        Route::put(
            "/user/usages/{usage_id}",
            scope("user.update.usage"),
            usages::update_user,
        ),
        // regimens
        Route::get(
            "/account/regimens",
            scope("account.regimens"),
            regimens::list_account,
        ),
        Route::get("/user/regimens", scope("user.regimens"), regimens::list_user),
        Route::get(
            "/account/regimens/{regimen_id}",
            scope("account.regimen"),
            regimens::show_account,
        ),
        Route::get(
            "/user/regimens/{regimen_id}",
            scope("user.regimen"),
            regimens::show_user,
        ),
        Route::put(
            "/account/regimens/{regimen_id}",
            scope("account.update.regimen"),
            regimens::update,
        ),
        Route::delete(
            "/account/regimens/{regimen_id}",
            scope("account.delete.regimen"),
            regimens::remove,
        ),
        // reminders
        Route::get(
            "/regimens/{regimen_id}/reminders",
            scope("user.reminder"),
            reminders::list_regimen,
        ),
        Route::get("/user/reminders", scope("user.reminders"), reminders::list_user),
        Route::post(
            "/regimens/{regimen_id}/reminders",
            scope("user.create.reminder"),
            reminders::create,
        ),
        Route::put(
            "/regimens/{regimen_id}/reminders/{reminder_id}",
            scope("user.update.reminder"),
            reminders::update,
        ),
        Route::delete(
            "/regimens/{regimen_id}/reminders/{reminder_id}",
            scope("user.delete.reminder"),
            reminders::remove,
        ),
        // invitations
        Route::get(
            "/invitation/{invitation_id}",
            scope("account.invitation"),
            invitations::show,
        ),
        Route::get("/invitation", scope("account.invitations"), invitations::list),
        Route::post(
            "/invitation",
            scope("account.invitation.create"),
            invitations::create,
        ),
        Route::delete(
            "/invitation/{invitation_id}",
            scope("account.invitation.delete"),
            invitations::remove,
        ),
        Route::get(
            "/invitation/{invitation_id}/accept",
            scope("account.invitation.accept"),
            invitations::accept,
        ),
    ]
}
