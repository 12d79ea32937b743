use clearpath_core::{DetailKey, EntityDetail, JobMetadata, SearchRequest, SearchResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{ApiError, ClientSettings, FailureKind};

/// Request/response endpoints of the search backend. The result stream is
/// handled separately by [`crate::run_stream`].
#[async_trait::async_trait]
pub trait SearchApi: Send + Sync {
    async fn submit_search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError>;

    async fn job_metadata(&self, job_id: &str) -> Result<JobMetadata, ApiError>;

    async fn entity_detail(&self, key: &DetailKey) -> Result<EntityDetail, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    base_url: Url,
    client: reqwest::Client,
    stream_client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        let stream_client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url,
            client,
            stream_client,
        })
    }

    /// Builds `{base}/api/{segments...}`, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    pub(crate) fn stream_url(&self, job_id: &str) -> Url {
        self.endpoint(&["jobs", job_id, "stream"])
    }

    pub(crate) fn stream_client(&self) -> &reqwest::Client {
        &self.stream_client
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl SearchApi for ReqwestApi {
    async fn submit_search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
        let body = serde_json::to_vec(request)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let response = self
            .client
            .post(self.endpoint(&["search"]))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn job_metadata(&self, job_id: &str) -> Result<JobMetadata, ApiError> {
        self.get_json(self.endpoint(&["jobs", job_id])).await
    }

    async fn entity_detail(&self, key: &DetailKey) -> Result<EntityDetail, ApiError> {
        self.get_json(self.endpoint(&["entity", key.jurisdiction(), key.identifier()]))
            .await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        let code = status.as_u16();
        return Err(match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(body) => ApiError::new(
                FailureKind::Rejected {
                    status: code,
                    detail: body.detail.clone(),
                },
                body.detail,
            ),
            Err(_) => ApiError::new(FailureKind::HttpStatus(code), status.to_string()),
        });
    }
    serde_json::from_slice(&bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() || err.is_body() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
