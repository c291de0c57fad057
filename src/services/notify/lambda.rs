use async_trait::async_trait;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use serde_json::Value;

use super::{FunctionInvoker, NotifyError};

#[derive(Debug, Clone)]
pub struct LambdaInvoker {
    client: Client,
}

impl LambdaInvoker {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionInvoker for LambdaInvoker {
    async fn invoke(&self, function: &str, payload: &Value) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(payload)?;

        let output = self
            .client
            .invoke()
            .function_name(function)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(body))
            .send()
            .await
            .map_err(|err| NotifyError::Invoke(DisplayErrorContext(&err).to_string()))?;

        if let Some(error) = output.function_error() {
            return Err(NotifyError::Invoke(format!("{function}: {error}")));
        }

        tracing::debug!(function, status = output.status_code(), "function invoked");
        Ok(())
    }
}
