use async_trait::async_trait;
use aws_sdk_sesv2::Client;
use aws_sdk_sesv2::error::DisplayErrorContext;
use aws_sdk_sesv2::types::{Destination, EmailContent, Template};
use serde_json::json;

use super::{InvitationEmail, Mailer, NotifyError};
use crate::config::InvitationMailConfig;

/// Templated invitation email through SES v2.
#[derive(Debug, Clone)]
pub struct SesMailer {
    client: Client,
    config: InvitationMailConfig,
}

impl SesMailer {
    pub fn new(client: Client, config: InvitationMailConfig) -> Self {
        Self { client, config }
    }

    fn landing_page(&self, code: &str) -> String {
        format!(
            "{}/invitation?invitation={}",
            self.config.landing_url.trim_end_matches('/'),
            code
        )
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send_invitation(&self, email: &InvitationEmail) -> Result<(), NotifyError> {
        let template_data = json!({
            "name": email.account_name,
            "invitationLandingPage": self.landing_page(&email.code),
        });

        let content = EmailContent::builder()
            .template(
                Template::builder()
                    .template_name(&self.config.template_name)
                    .template_data(template_data.to_string())
                    .build(),
            )
            .build();

        self.client
            .send_email()
            .from_email_address(&self.config.sender)
            .set_from_email_address_identity_arn(self.config.source_arn.clone())
            .destination(
                Destination::builder()
                    .to_addresses(&email.recipient)
                    .build(),
            )
            .content(content)
            .send()
            .await
            .map_err(|err| NotifyError::Email(DisplayErrorContext(&err).to_string()))?;

        tracing::info!(recipient = %email.recipient, "invitation email sent");
        Ok(())
    }
}
