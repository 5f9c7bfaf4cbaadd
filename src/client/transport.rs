use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use super::SimulationError;
use crate::core::{SimulationRequest, SimulationResult};

#[async_trait]
pub trait SimulationTransport: Send + Sync {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, SimulationError>;
}

#[async_trait]
impl<T: SimulationTransport + ?Sized> SimulationTransport for Arc<T> {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, SimulationError> {
        (**self).simulate(request).await
    }
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SimulationTransport for HttpTransport {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, SimulationError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| SimulationError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SimulationError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| SimulationError::Transport(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}
