/*
 * Responsibility
 * - Invitation 作成 request の DTO と validate()
 */
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct CreateInvitationRequest {
    pub email: String,
    pub meta: Option<Value>,
}

impl CreateInvitationRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err("email is required");
        }
        if !email.contains('@') || email.len() > 320 {
            return Err("email is invalid");
        }

        Ok(())
    }

    /// Invitations are matched on the lower-cased address.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}
