/*!
 * Business records
 *
 * Responsibility:
 * - 各テーブルの record 型 (serde で JSON record と相互変換)
 * - テーブル名 / カラム / soft delete の有無 / response filter の root 名を Entity trait で宣言
 *
 * Notes:
 * - 全 record は `id`, `created_at`, `updated_at` を持つ。値の採番は Repo 側で行う。
 */
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

mod access;
mod account;
mod device;
mod invitation;
mod regimen;

pub use access::{Permission, Role, RolePermission};
pub use account::{Account, User};
pub use device::{Barcode, Connection, Dispenser, Insertion, Pod};
pub use invitation::Invitation;
pub use regimen::{Regimen, Reminder, Usage};

/// Storage descriptor handed to a `RecordStore`.
#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub soft_delete: bool,
}

pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static str;
    /// Root segment of the dotted field paths used by the response filter.
    const SCOPE: &'static str;
    const COLUMNS: &'static [&'static str];
    const SOFT_DELETE: bool = true;

    fn id(&self) -> Uuid;

    fn table() -> Table {
        Table {
            name: Self::TABLE,
            columns: Self::COLUMNS,
            soft_delete: Self::SOFT_DELETE,
        }
    }
}
