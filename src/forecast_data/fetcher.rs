use crate::forecast_data::error::FetchError;
use crate::types::forecast_request::ForecastRequest;
use log::{error, info};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// How much of an undecodable body is kept for diagnostics.
const BODY_EXCERPT_CHARS: usize = 500;

pub struct ForecastFetcher {
    client: Client,
    endpoint: String,
    request: ForecastRequest,
}

impl ForecastFetcher {
    pub fn new(
        request: ForecastRequest,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            request,
        })
    }

    pub fn request(&self) -> &ForecastRequest {
        &self.request
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issues one GET for the configured request and decodes the body as JSON.
    ///
    /// Any JSON value is returned; checking its shape is the transformer's job.
    pub async fn fetch(&self) -> Result<Value, FetchError> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&self.request.query_pairs())
            .build()
            .map_err(|e| FetchError::InvalidRequest(self.endpoint.clone(), e))?;
        let url = request.url().to_string();
        info!("Fetching forecast data from: {}", url);

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching forecast data from {}: {}", url, e);
                return Err(FetchError::NetworkRequest(url, e));
            }
        };

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                error!("HTTP error for {}: {}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url, e)
                });
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!("Error reading forecast response from {}: {}", url, e);
                return Err(FetchError::NetworkRequest(url, e));
            }
        };

        match serde_json::from_str::<Value>(&body) {
            Ok(json) => {
                info!("Forecast data fetched successfully ({} bytes).", body.len());
                Ok(json)
            }
            Err(e) => {
                let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
                error!("Failed to decode JSON response from {}: {}", url, e);
                error!("Response text was: {}", excerpt);
                Err(FetchError::Decode {
                    url,
                    excerpt,
                    source: e,
                })
            }
        }
    }
}
