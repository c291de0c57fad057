/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - store: RecordStore, validator: TokenValidator, claims: ClaimsDecoder, mailer / functions
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - 起動後は read-only (request 間で共有される mutable state は持たない)
 */
use std::sync::Arc;

use crate::repos::{RecordStore, Repo, entities::Entity};
use crate::services::{
    claims::ClaimsDecoder,
    notify::{FunctionInvoker, Mailer},
    validator::TokenValidator,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub validator: Arc<dyn TokenValidator>,
    pub claims: Arc<ClaimsDecoder>,
    pub mailer: Arc<dyn Mailer>,
    pub functions: Arc<dyn FunctionInvoker>,
    pub dispense_function: Arc<str>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        validator: Arc<dyn TokenValidator>,
        mailer: Arc<dyn Mailer>,
        functions: Arc<dyn FunctionInvoker>,
        dispense_function: &str,
    ) -> Self {
        Self {
            store,
            validator,
            claims: Arc::new(ClaimsDecoder::new()),
            mailer,
            functions,
            dispense_function: Arc::from(dispense_function),
        }
    }

    pub fn repo<E: Entity>(&self) -> Repo<E> {
        Repo::new(self.store.clone())
    }
}
