//! Developer / admin routes. The validator checks route + method against the
//! caller's role; responses are returned unfiltered.

use crate::api::handlers::{accounts, barcodes, crud, roles};
use crate::middleware::auth::AuthMode;
use crate::repos::entities::{
    Account, Barcode, Connection, Dispenser, Insertion, Permission, Pod, Regimen, Role, Usage,
    User,
};

use super::Route;

const AUTH: AuthMode = AuthMode::Explicit;

pub(super) fn routes() -> Vec<Route> {
    vec![
        // users (PUT /user/{user_id} is owned by the trusted external id update)
        Route::get("/users", AUTH, crud::list::<User>),
        Route::get("/user/{user_id}", AUTH, crud::show::<User>),
        Route::post("/users", AUTH, crud::create::<User>),
        Route::delete("/user/{user_id}", AUTH, crud::remove::<User>),
        // accounts
        Route::get("/accounts", AUTH, crud::list::<Account>),
        Route::get("/accounts/{account_id}", AUTH, crud::show::<Account>),
        Route::post("/accounts", AUTH, crud::create::<Account>),
        Route::put("/accounts/{account_id}", AUTH, crud::update::<Account>),
        Route::delete("/accounts/{account_id}", AUTH, crud::remove::<Account>),
        Route::get("/accounts/{account_id}/users", AUTH, accounts::list_users),
        Route::post("/accounts/{account_id}/users", AUTH, accounts::create_user),
        Route::put(
            "/accounts/{account_id}/users/{user_id}",
            AUTH,
            accounts::update_user,
        ),
        Route::delete(
            "/accounts/{account_id}/users/{user_id}",
            AUTH,
            accounts::delete_user,
        ),
        // pods
        Route::get("/pods", AUTH, crud::list::<Pod>),
        Route::get("/pods/{pod_id}", AUTH, crud::show::<Pod>),
        Route::post("/pods", AUTH, crud::create::<Pod>),
        Route::put("/pods/{pod_id}", AUTH, crud::update::<Pod>),
        Route::delete("/pods/{pod_id}", AUTH, crud::remove::<Pod>),
        // barcodes
        Route::get("/barcodes", AUTH, crud::list::<Barcode>),
        Route::get("/barcodes/{barcode_id}", AUTH, crud::show::<Barcode>),
        Route::post("/barcodes", AUTH, crud::create::<Barcode>),
        Route::put("/barcodes/code/{code}", AUTH, barcodes::update_by_code),
        Route::put("/barcodes/{barcode_id}", AUTH, crud::update::<Barcode>),
        Route::delete("/barcodes/{barcode_id}", AUTH, crud::remove::<Barcode>),
        // dispensers
        Route::get("/dispensers", AUTH, crud::list::<Dispenser>),
        Route::get("/dispensers/{dispenser_id}", AUTH, crud::show::<Dispenser>),
        Route::post("/dispensers", AUTH, crud::create::<Dispenser>),
        Route::put("/dispensers/{dispenser_id}", AUTH, crud::update::<Dispenser>),
        Route::delete("/dispensers/{dispenser_id}", AUTH, crud::remove::<Dispenser>),
        // connections
        Route::get("/connections", AUTH, crud::list::<Connection>),
        Route::get("/connections/{connection_id}", AUTH, crud::show::<Connection>),
        Route::post("/connections", AUTH, crud::create::<Connection>),
        Route::put("/connections/{connection_id}", AUTH, crud::update::<Connection>),
        Route::delete("/connections/{connection_id}", AUTH, crud::remove::<Connection>),
        // insertions
        Route::get("/insertions", AUTH, crud::list::<Insertion>),
        Route::get("/insertions/{insertion_id}", AUTH, crud::show::<Insertion>),
        Route::post("/insertions", AUTH, crud::create::<Insertion>),
        Route::put("/insertions/{insertion_id}", AUTH, crud::update::<Insertion>),
        Route::delete("/insertions/{insertion_id}", AUTH, crud::remove::<Insertion>),
        // regimens (created by dispenser events, never directly)
        Route::get("/regimens", AUTH, crud::list::<Regimen>),
        Route::get("/regimens/{regimen_id}", AUTH, crud::show::<Regimen>),
        Route::put("/regimens/{regimen_id}", AUTH, crud::update::<Regimen>),
        Route::delete("/regimens/{regimen_id}", AUTH, crud::remove::<Regimen>),
        // usages
        Route::get("/usages", AUTH, crud::list::<Usage>),
        Route::get("/usages/{usage_id}", AUTH, crud::show::<Usage>),
        Route::post("/usages", AUTH, crud::create::<Usage>),
        Route::put("/usages/{usage_id}", AUTH, crud::update::<Usage>),
        Route::delete("/usages/{usage_id}", AUTH, crud::remove::<Usage>),
        // permissions
        Route::get("/permissions", AUTH, crud::list::<Permission>),
        Route::get("/permissions/{permission_id}", AUTH, crud::show::<Permission>),
        Route::post("/permissions", AUTH, crud::create::<Permission>),
        Route::put("/permissions/{permission_id}", AUTH, crud::update::<Permission>),
        Route::delete("/permissions/{permission_id}", AUTH, crud::remove::<Permission>),
        // roles
        Route::get("/roles", AUTH, crud::list::<Role>),
        Route::get("/roles/{role_id}", AUTH, crud::show::<Role>),
        Route::post("/role", AUTH, crud::create::<Role>),
        Route::put("/roles/{role_id}", AUTH, crud::update::<Role>),
        Route::delete("/roles/{role_id}", AUTH, crud::remove::<Role>),
        Route::get("/roles/{role_id}/permissions", AUTH, roles::with_permissions),
        Route::delete(
            "/roles/{role_id}/permission/{permission_id}",
            AUTH,
            roles::detach_permission,
        ),
        Route::put(
            "/roles/{role_id}/{permission_id}",
            AUTH,
            roles::attach_permission,
        ),
    ]
}
