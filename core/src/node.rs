use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read-only access to contract view functions.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Returns the raw array of returned values.
    async fn invoke_view(
        &self,
        function: &str,
        type_arguments: &[String],
        arguments: &[String],
    ) -> Result<Value>;
}

/// Node REST client.
pub struct HttpNodeClient {
    client: reqwest::Client,
    view_url: Url,
}

impl HttpNodeClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut view_url = Url::parse(base_url).context("invalid node url")?;
        view_url
            .path_segments_mut()
            .map_err(|_e| anyhow::anyhow!("node url cannot have a path"))?
            .pop_if_empty()
            .extend(["rpc", "v1", "view"]);

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .context("failed to build http client")?;

        Ok(Self { client, view_url })
    }

    pub fn view_url(&self) -> &Url {
        &self.view_url
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    async fn invoke_view(
        &self,
        function: &str,
        type_arguments: &[String],
        arguments: &[String],
    ) -> Result<Value> {
        let response = self
            .client
            .post(self.view_url.clone())
            .json(&ViewRequest {
                function,
                type_arguments,
                arguments,
            })
            .send()
            .await?;

        let status = response.status();
        let res = response.text().await?;
        tracing::debug!(function, %status, res);

        anyhow::ensure!(status.is_success(), "view request failed ({status}): {res}");

        let ViewResponse { result } = serde_json::from_str(&res)?;
        Ok(result)
    }
}

#[derive(Serialize)]
struct ViewRequest<'a> {
    function: &'a str,
    type_arguments: &'a [String],
    arguments: &'a [String],
}

#[derive(Deserialize)]
struct ViewResponse {
    result: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_url() {
        let client = HttpNodeClient::new("https://rpc-testnet.supra.com").unwrap();
        assert_eq!(
            client.view_url().as_str(),
            "https://rpc-testnet.supra.com/rpc/v1/view"
        );

        let client = HttpNodeClient::new("http://127.0.0.1:27001/").unwrap();
        assert_eq!(client.view_url().as_str(), "http://127.0.0.1:27001/rpc/v1/view");

        // Path prefix is kept
        let client = HttpNodeClient::new("https://example.com/supra").unwrap();
        assert_eq!(
            client.view_url().as_str(),
            "https://example.com/supra/rpc/v1/view"
        );

        let client = HttpNodeClient::new("https://example.com/supra/").unwrap();
        assert_eq!(
            client.view_url().as_str(),
            "https://example.com/supra/rpc/v1/view"
        );

        assert!(HttpNodeClient::new("not a url").is_err());
        assert!(HttpNodeClient::new("mailto:node@example.com").is_err());
    }

    #[test]
    fn serde() {
        let request = ViewRequest {
            function: "0x1::voting::get_winner",
            type_arguments: &[],
            arguments: &["5".to_owned()],
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"function":"0x1::voting::get_winner","type_arguments":[],"arguments":["5"]}"#
        );

        let json = r#"{"result":[{"vec":["1"]}]}"#;
        let ViewResponse { result } = serde_json::from_str(json).unwrap();
        assert_eq!(result, serde_json::json!([{ "vec": ["1"] }]));

        assert!(serde_json::from_str::<ViewResponse>(r#"{"error":"boom"}"#).is_err());
    }
}
