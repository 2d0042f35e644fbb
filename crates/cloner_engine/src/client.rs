use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::wire::{
    error_message, EditRequest, EditResponse, GenerateRequest, GenerateResponse,
    LatestScrapedResponse, ScrapeRequest, ScrapeResponse,
};
use crate::{FailureKind, ScrapeOutput, ServiceError};

/// Route paths, appended to [`ServiceSettings::base_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub scrape: String,
    pub generate: String,
    pub edit: String,
    pub latest_scraped: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            scrape: "/api/scrape".to_string(),
            generate: "/api/generate".to_string(),
            edit: "/api/edit".to_string(),
            latest_scraped: "/api/latest-scraped".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub routes: Routes,
    pub connect_timeout: Duration,
    /// Whole-request limit. Generation is slow, so this is generous.
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            routes: Routes::default(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
        }
    }
}

/// The three pipeline services plus the latest-scrape lookup.
#[async_trait::async_trait]
pub trait ClonerService: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapeOutput, ServiceError>;

    async fn generate(&self, raw_html_path: &str, model: &str) -> Result<String, ServiceError>;

    async fn edit(
        &self,
        html_content: &str,
        instruction: &str,
        model: &str,
    ) -> Result<String, ServiceError>;

    /// `Ok(None)` when the backend has not scraped anything yet.
    async fn latest_scraped(&self) -> Result<Option<String>, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestService {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl ReqwestService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, route: &str) -> Result<Url, ServiceError> {
        let base = self.settings.base_url.trim_end_matches('/');
        let route = route.trim_start_matches('/');
        Url::parse(&format!("{base}/{route}"))
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn post_json<B, R>(&self, route: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(route)?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn get_json<R>(&self, route: &str) -> Result<R, ServiceError>
    where
        R: DeserializeOwned,
    {
        let url = self.endpoint(route)?;
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
impl ClonerService for ReqwestService {
    async fn scrape(&self, url: &str) -> Result<ScrapeOutput, ServiceError> {
        let response: ScrapeResponse = self
            .post_json(&self.settings.routes.scrape, &ScrapeRequest { url })
            .await?;
        Ok(ScrapeOutput {
            raw_html: response.raw_html,
            raw_html_path: response.raw_html_path,
        })
    }

    async fn generate(&self, raw_html_path: &str, model: &str) -> Result<String, ServiceError> {
        let response: GenerateResponse = self
            .post_json(
                &self.settings.routes.generate,
                &GenerateRequest {
                    raw_html_path,
                    model,
                },
            )
            .await?;
        Ok(response.generated_html)
    }

    async fn edit(
        &self,
        html_content: &str,
        instruction: &str,
        model: &str,
    ) -> Result<String, ServiceError> {
        let response: EditResponse = self
            .post_json(
                &self.settings.routes.edit,
                &EditRequest {
                    html_content,
                    instruction,
                    model,
                },
            )
            .await?;
        Ok(response.edited_html)
    }

    async fn latest_scraped(&self) -> Result<Option<String>, ServiceError> {
        let response: LatestScrapedResponse =
            self.get_json(&self.settings.routes.latest_scraped).await?;
        Ok(response
            .latest_scraped_path
            .filter(|path| !path.trim().is_empty()))
    }
}

async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ServiceError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());
    let body = response.text().await.map_err(map_reqwest_error)?;

    if !status.is_success() {
        return Err(ServiceError::new(
            FailureKind::HttpStatus(status.as_u16()),
            error_message(content_type.as_deref(), &body),
        ));
    }

    serde_json::from_str(&body).map_err(|err| {
        ServiceError::new(
            FailureKind::Decode,
            format!("unexpected response from service: {err}"),
        )
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
