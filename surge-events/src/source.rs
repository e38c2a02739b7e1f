//! Where event-status answers come from

use crate::request::PollRequest;
use async_trait::async_trait;
use surge_http::{tenant_headers, ApiResponse, CloudApi, HttpResult};

/// One query of the event-status endpoint
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch(&self, request: &PollRequest) -> HttpResult<ApiResponse>;
}

#[async_trait]
impl EventSource for CloudApi {
    async fn fetch(&self, request: &PollRequest) -> HttpResult<ApiResponse> {
        let headers = tenant_headers(&request.access_token)?;
        self.get(&request.path(), &headers, Some(request.request_timeout))
            .await
    }
}
