use crate::forms::FormError;
use resource_store::{AtomicRequest, ResourceKey, StoreClient};
use tracing::{info, instrument, warn};

/// Sends atomic write requests on behalf of admin forms.
///
/// Holds the admin token; every failure is mapped to a [`FormError`] so
/// callers only ever deal with user-facing outcomes.
#[derive(Debug, Clone)]
pub struct AtomicSubmitter {
    store: StoreClient,
    auth_token: Option<String>,
}

impl AtomicSubmitter {
    pub fn new(store: StoreClient, auth_token: Option<String>) -> Self {
        Self {
            store,
            auth_token: auth_token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.auth_token = token.filter(|t| !t.trim().is_empty());
    }

    /// Posts `request`; on success the results are already merged into the store.
    ///
    /// `resource` names what is being edited, for the not-found message.
    #[instrument(skip(self, request), fields(operations = request.operations.len()))]
    pub async fn submit(
        &self,
        request: &AtomicRequest,
        resource: &'static str,
    ) -> Result<Vec<ResourceKey>, FormError> {
        if request.is_empty() {
            return Err(FormError::validation("There are no changes to save"));
        }
        let Some(token) = self.auth_token.as_deref() else {
            warn!("No admin token configured");
            return Err(FormError::PermissionDenied);
        };

        match self.store.submit_atomic(request, token).await {
            Ok(keys) => {
                info!(merged = keys.len(), "Form saved");
                Ok(keys)
            }
            Err(e) => {
                let error = FormError::from_store(e, resource);
                warn!(%error, "Form rejected");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_store::mock::MockTransport;
    use resource_store::{Operation, StoreActor};
    use serde_json::Map;

    fn submitter(mock: &MockTransport, token: Option<&str>) -> AtomicSubmitter {
        let (actor, store) = StoreActor::new(16, mock.transport());
        tokio::spawn(actor.run());
        AtomicSubmitter::new(store, token.map(String::from))
    }

    #[tokio::test]
    async fn missing_token_never_reaches_the_network() {
        let mock = MockTransport::new();
        let submitter = submitter(&mock, None);
        let request = AtomicRequest::new(vec![Operation::add("modems", Map::new())]);

        let result = submitter.submit(&request, "modem").await;

        assert_eq!(result, Err(FormError::PermissionDenied));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn blank_token_counts_as_missing() {
        let mock = MockTransport::new();
        let mut submitter = submitter(&mock, Some("  "));
        let request = AtomicRequest::new(vec![Operation::add("modems", Map::new())]);

        assert_eq!(submitter.submit(&request, "modem").await, Err(FormError::PermissionDenied));

        submitter.set_auth_token(Some(String::new()));
        assert_eq!(submitter.submit(&request, "modem").await, Err(FormError::PermissionDenied));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn empty_request_is_rejected_locally() {
        let mock = MockTransport::new();
        let submitter = submitter(&mock, Some("token"));

        let result = submitter.submit(&AtomicRequest::new(vec![]), "modem").await;

        assert!(result.unwrap_err().is_validation());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn server_errors_are_mapped() {
        let mut mock = MockTransport::new();
        mock.expect_post("operations").return_status(404);
        mock.expect_post("operations").return_err("connection refused");
        let submitter = submitter(&mock, Some("token"));
        let request = AtomicRequest::new(vec![Operation::update("modems", "1", Map::new())]);

        let first = submitter.submit(&request, "modem").await;
        let second = submitter.submit(&request, "modem").await;

        assert_eq!(first, Err(FormError::NotFound { resource: "modem" }));
        assert!(matches!(second, Err(FormError::Network(_))));
        mock.verify();
    }
}
