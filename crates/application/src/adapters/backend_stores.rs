use api::{BackendClient, Stored};
use async_trait::async_trait;
use common::DeskResult;
use domain::{PensionInfo, ResponseSettings};

use crate::ports::RemoteStore;

/// `GET`/`POST /pension-info`.
#[derive(Clone, Debug)]
pub struct PensionInfoStore {
    client: BackendClient,
}

impl PensionInfoStore {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }
}

#[async_trait]
impl RemoteStore for PensionInfoStore {
    type Document = PensionInfo;

    fn name(&self) -> &'static str {
        "pension-info"
    }

    async fn load(&self) -> DeskResult<Stored<PensionInfo>> {
        self.client.pension_info().await
    }

    async fn save(&self, document: &PensionInfo) -> DeskResult<()> {
        self.client.save_pension_info(document).await
    }
}

/// `GET`/`POST /response-settings`.
#[derive(Clone, Debug)]
pub struct ResponseSettingsStore {
    client: BackendClient,
}

impl ResponseSettingsStore {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }
}

#[async_trait]
impl RemoteStore for ResponseSettingsStore {
    type Document = ResponseSettings;

    fn name(&self) -> &'static str {
        "response-settings"
    }

    async fn load(&self) -> DeskResult<Stored<ResponseSettings>> {
        self.client.response_settings().await
    }

    async fn save(&self, document: &ResponseSettings) -> DeskResult<()> {
        self.client.save_response_settings(document).await
    }
}
