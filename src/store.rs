use std::sync::RwLock;

use async_trait::async_trait;

use crate::models::{Form, FormResponse};
use crate::types::FormId;

/// Error type for store implementations.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Consumer-provided document store for forms and their responses.
///
/// The backend only needs lookups and inserts; whatever database sits
/// behind this trait is the deployment's choice.
///
/// # Example
///
/// ```rust,ignore
/// #[async_trait]
/// impl FormStore for MyDatabase {
///     async fn list_forms(&self) -> Result<Vec<Form>, StoreError> {
///         self.collection("forms").find_all().await
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait FormStore: Send + Sync + 'static {
    /// All form definitions.
    async fn list_forms(&self) -> Result<Vec<Form>, StoreError>;

    /// Look up a single form by id.
    async fn find_form(&self, id: &FormId) -> Result<Option<Form>, StoreError>;

    /// Persist a submitted response.
    async fn insert_response(&self, response: FormResponse) -> Result<(), StoreError>;
}

/// In-memory store, used by tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryFormStore {
    forms: RwLock<Vec<Form>>,
    responses: RwLock<Vec<FormResponse>>,
}

impl MemoryFormStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with form definitions.
    #[must_use]
    pub fn with_forms(forms: Vec<Form>) -> Self {
        Self {
            forms: RwLock::new(forms),
            responses: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the stored responses (test inspection).
    #[must_use]
    pub fn responses(&self) -> Vec<FormResponse> {
        self.responses
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FormStore for MemoryFormStore {
    async fn list_forms(&self) -> Result<Vec<Form>, StoreError> {
        let forms = self
            .forms
            .read()
            .map_err(|_| StoreError::from("forms lock poisoned"))?;
        Ok(forms.clone())
    }

    async fn find_form(&self, id: &FormId) -> Result<Option<Form>, StoreError> {
        let forms = self
            .forms
            .read()
            .map_err(|_| StoreError::from("forms lock poisoned"))?;
        Ok(forms.iter().find(|f| &f.id == id).cloned())
    }

    async fn insert_response(&self, response: FormResponse) -> Result<(), StoreError> {
        let mut responses = self
            .responses
            .write()
            .map_err(|_| StoreError::from("responses lock poisoned"))?;
        responses.push(response);
        Ok(())
    }
}
