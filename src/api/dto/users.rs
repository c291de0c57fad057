/*
 * Responsibility
 * - 外部 (WordPress) id 経由の user 更新 request
 * - 空文字は「更新しない」扱い
 */
use serde::Deserialize;

use crate::repos::entities::User;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExternalUserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ExternalUserUpdate {
    pub fn apply_to(self, user: &mut User) {
        if !self.first_name.is_empty() {
            user.first_name = self.first_name;
        }
        if !self.last_name.is_empty() {
            user.last_name = self.last_name;
        }
        if !self.email.is_empty() {
            user.email = self.email;
        }
    }
}
