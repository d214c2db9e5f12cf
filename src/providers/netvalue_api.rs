use crate::core::series::TimeSeries;
use crate::core::source::NetValueSource;
use crate::providers::util::{RetryPolicy, with_retry};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

const NET_VALUE_ENDPOINT: &str = "/api/1/statistics/netvalue";

/// Queries the saved net value snapshots from the backend's statistics API.
pub struct NetValueApi {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl NetValueApi {
    pub fn new(base_url: &str, retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("networth/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(NetValueApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retry,
        })
    }
}

#[derive(Deserialize, Debug)]
struct NetValueResponse {
    result: Option<NetValuePayload>,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize, Debug)]
struct NetValuePayload {
    times: Vec<i64>,
    /// JSON numbers are read from their literal text, strings may use
    /// scientific notation.
    data: Vec<Decimal>,
}

impl NetValuePayload {
    fn into_series(self) -> Result<TimeSeries> {
        TimeSeries::new(self.times, self.data)
    }
}

#[async_trait]
impl NetValueSource for NetValueApi {
    #[instrument(name = "NetValueFetch", skip(self))]
    async fn query_net_value_data(&self, include_nft: bool) -> Result<TimeSeries> {
        let url = format!(
            "{}{}?include_nfts={}",
            self.base_url, NET_VALUE_ENDPOINT, include_nft
        );
        debug!("Requesting net value data from {}", url);

        let client = &self.client;
        let request_url = url.as_str();
        let response = with_retry(
            move || async move { client.get(request_url).send().await?.error_for_status() },
            self.retry,
        )
        .await
        .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;

        let text = response.text().await?;
        let body: NetValueResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse net value response: {}", e))?;

        let payload = body.result.ok_or_else(|| {
            anyhow!(
                "No net value data in response: {}",
                if body.message.is_empty() {
                    "empty result"
                } else {
                    body.message.as_str()
                }
            )
        })?;

        let series = payload.into_series()?;
        debug!(points = series.len(), "Received net value data");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(include_nfts: &str, template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(NET_VALUE_ENDPOINT))
            .and(query_param("include_nfts", include_nfts))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn api(server: &MockServer) -> NetValueApi {
        NetValueApi::new(&server.uri(), RetryPolicy::none()).unwrap()
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let mock_response = r#"{
            "result": {
                "times": [1600000000, 1600086400, 1600172800],
                "data": ["1500.25", 1600.5, 0]
            },
            "message": ""
        }"#;
        let mock_server =
            create_mock_server("true", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let series = api(&mock_server).query_net_value_data(true).await.unwrap();
        assert_eq!(series.times, vec![1600000000, 1600086400, 1600172800]);
        assert_eq!(series.data, vec![dec!(1500.25), dec!(1600.5), dec!(0)]);
    }

    #[tokio::test]
    async fn test_long_numbers_are_not_rounded() {
        let mock_response = r#"{
            "result": {"times": [1, 2], "data": [98765432109876.54321012, 0.30000000000000000001]},
            "message": ""
        }"#;
        let mock_server =
            create_mock_server("true", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let series = api(&mock_server).query_net_value_data(true).await.unwrap();
        assert_eq!(
            series.data,
            vec![dec!(98765432109876.54321012), dec!(0.30000000000000000001)]
        );
    }

    #[tokio::test]
    async fn test_include_nfts_flag_is_forwarded() {
        let mock_response = r#"{"result": {"times": [], "data": []}, "message": ""}"#;
        let mock_server =
            create_mock_server("false", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let series = api(&mock_server).query_net_value_data(false).await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_null_result_is_an_error() {
        let mock_response = r#"{"result": null, "message": "User is not logged in"}"#;
        let mock_server =
            create_mock_server("true", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let result = api(&mock_server).query_net_value_data(true).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No net value data in response: User is not logged in"
        );
    }

    #[tokio::test]
    async fn test_length_mismatch_is_an_error() {
        let mock_response = r#"{"result": {"times": [1, 2], "data": [1]}, "message": ""}"#;
        let mock_server =
            create_mock_server("true", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let result = api(&mock_server).query_net_value_data(true).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Mismatched net value series")
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_response = r#"{"result": {"timestamps": [1], "data": [1]}}"#;
        let mock_server =
            create_mock_server("true", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let result = api(&mock_server).query_net_value_data(true).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse net value response")
        );
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(NET_VALUE_ENDPOINT))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&mock_server)
            .await;

        let api = NetValueApi::new(
            &mock_server.uri(),
            RetryPolicy {
                retries: 2,
                delay: std::time::Duration::from_millis(1),
            },
        )
        .unwrap();

        let result = api.query_net_value_data(true).await;
        let message = result.unwrap_err().to_string();
        assert!(message.starts_with("Request error:"), "{message}");
        assert!(message.contains("500"), "{message}");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(NET_VALUE_ENDPOINT))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = api(&mock_server).query_net_value_data(true).await;
        assert!(result.is_err());
    }
}
