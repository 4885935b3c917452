//! Remote gateway for the machine learning module resource
//!
//! Translates the four module operations into HTTP calls. Failures are handed
//! back to the caller untouched: no retries, no caching, no deduplication.

use mlmod_protocol::api::{
    module_path, CreateModuleRequest, CreateModuleResponse, ListModulesResponse, UpdateModuleRequest,
    UpdateModuleResponse, MODULES_PATH,
};
use reqwest::Method;

use crate::client::BaseClient;
use crate::config::ClientConfig;
use crate::error::Result;

/// Remote operations on module records
#[allow(async_fn_in_trait)]
pub trait ModuleGateway {
    /// Fetch every module, in server order
    async fn list(&self) -> Result<ListModulesResponse>;

    /// Create a module; the server assigns its id
    async fn create(&self, payload: &CreateModuleRequest) -> Result<CreateModuleResponse>;

    /// Replace the module identified by `payload.id`, returning the server's copy
    async fn update(&self, payload: &UpdateModuleRequest) -> Result<UpdateModuleResponse>;

    /// Delete the module with the given id
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Gateway backed by the REST API
#[derive(Debug, Clone)]
pub struct HttpModuleGateway {
    client: BaseClient,
}

impl HttpModuleGateway {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: BaseClient::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }
}

impl ModuleGateway for HttpModuleGateway {
    async fn list(&self) -> Result<ListModulesResponse> {
        self.client
            .request::<(), _>(Method::GET, MODULES_PATH, None)
            .await
    }

    async fn create(&self, payload: &CreateModuleRequest) -> Result<CreateModuleResponse> {
        self.client
            .request(Method::POST, MODULES_PATH, Some(payload))
            .await
    }

    async fn update(&self, payload: &UpdateModuleRequest) -> Result<UpdateModuleResponse> {
        self.client
            .request(Method::PUT, &module_path(&payload.id), Some(payload))
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .request_empty::<()>(Method::DELETE, &module_path(id), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ModuleController;
    use crate::error::ErrorCode;
    use crate::tests::utils::test_helpers::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn gateway_for(server: &MockServer) -> HttpModuleGateway {
        let config = ClientConfig {
            base_url: server.base_url(),
            use_proxy: false,
            ..ClientConfig::default()
        };
        HttpModuleGateway::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_list_returns_server_order() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/machine-learning-modules");
                then.status(200).json_body(json!([
                    module_json("2", "neural_network"),
                    module_json("1", "random_forest")
                ]));
            })
            .await;

        let modules = gateway_for(&server).list().await.unwrap();

        mock.assert_async().await;
        let ids: Vec<&str> = modules.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_list_accepts_local_timestamps() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/machine-learning-modules");
                then.status(200).json_body(json!([{
                    "id": 1,
                    "modelType": "random_forest",
                    "historicalDataPath": "/data/h.csv",
                    "createdAt": "2024-03-01T10:00:00",
                    "updatedAt": "2024-03-02T10:00:00.123456"
                }]));
            })
            .await;

        let mut controller = ModuleController::new(gateway_for(&server));

        assert!(controller.mount().await);
        assert_eq!(controller.error(), None);
        let module = controller.modules().get("1").unwrap();
        assert_eq!(
            module.updated_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
            Some("2024-03-02 10:00".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_posts_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/machine-learning-modules")
                    .json_body(json!({
                        "modelType": "neural_network",
                        "historicalDataPath": "/data/history.csv",
                        "inputParameters": {"soil_ph": 6.5},
                        "mermaidDiagram": "graph TD\n A --> B"
                    }));
                then.status(201).json_body(module_json("2", "neural_network"));
            })
            .await;

        let created = gateway_for(&server)
            .create(&sample_create_request())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, "2");
        assert_eq!(created.model_type, "neural_network");
    }

    #[tokio::test]
    async fn test_update_puts_to_id_path() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/machine-learning-modules/7");
                then.status(200).json_body(module_json("7", "gradient_boosting"));
            })
            .await;

        let payload = sample_create_request().with_id("7");
        let updated = gateway_for(&server).update(&payload).await.unwrap();

        mock.assert_async().await;
        assert_eq!(updated.model_type, "gradient_boosting");
    }

    #[tokio::test]
    async fn test_delete_ignores_empty_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/machine-learning-modules/1");
                then.status(204);
            })
            .await;

        gateway_for(&server).delete("1").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_error_carries_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/machine-learning-modules/9");
                then.status(404)
                    .json_body(json!({"message": "MachineLearningModule with id 9 not found"}));
            })
            .await;

        let err = gateway_for(&server).delete("9").await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ApiError);
        assert_eq!(err.message(), Some("MachineLearningModule with id 9 not found"));
    }

    #[tokio::test]
    async fn test_http_error_without_body_has_no_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/machine-learning-modules");
                then.status(500);
            })
            .await;

        let err = gateway_for(&server).list().await.unwrap_err();

        assert!(err.is_network_error());
        assert_eq!(err.message(), None);
    }

    #[tokio::test]
    async fn test_malformed_response_is_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/machine-learning-modules");
                then.status(200).body("<html>gateway</html>");
            })
            .await;

        let err = gateway_for(&server).list().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidResponse);
    }
}
