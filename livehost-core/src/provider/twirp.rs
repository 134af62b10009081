//! Twirp/JSON transport for the provider's admin API
//!
//! Each RPC is `POST {base}/twirp/{package.Service}/{Method}` with a JSON body
//! and a bearer token. Failures come back as `{"code": ..., "msg": ...}`.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{ProviderError, Result};
use super::token::{TokenSigner, VideoGrant};

const TWIRP_PREFIX: &str = "twirp";

#[derive(Debug, Deserialize)]
struct TwirpErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    msg: String,
}

/// HTTP transport shared by the room and ingress clients
///
/// Holds no per-call state; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct TwirpClient {
    base_url: String,
    client: Client,
    signer: TokenSigner,
}

impl TwirpClient {
    pub fn new(base_url: &str, signer: TokenSigner, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            client,
            signer,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke `service/method` with `body`, authorized by `grant`
    pub async fn call<Req, Resp>(
        &self,
        service: &str,
        method: &str,
        grant: VideoGrant,
        body: &Req,
    ) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{TWIRP_PREFIX}/{service}/{method}", self.base_url);
        let token = self.signer.sign(grant)?;

        tracing::trace!(%url, "Provider request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let (code, msg) = match serde_json::from_slice::<TwirpErrorBody>(&bytes) {
                Ok(err) => (err.code, err.msg),
                Err(_) => (
                    "unknown".to_string(),
                    String::from_utf8_lossy(&bytes).into_owned(),
                ),
            };
            return Err(ProviderError::Twirp {
                status: status.as_u16(),
                code,
                msg,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Accept the provider's WebSocket URL as well as its HTTP URL
fn normalize_base_url(raw: &str) -> Result<String> {
    let mut url = url::Url::parse(raw)
        .map_err(|e| ProviderError::InvalidConfig(format!("Invalid provider URL {raw}: {e}")))?;

    let scheme = match url.scheme() {
        "ws" | "http" => "http",
        "wss" | "https" => "https",
        other => {
            return Err(ProviderError::InvalidConfig(format!(
                "Unsupported provider URL scheme: {other}"
            )))
        }
    };
    if url.scheme() != scheme {
        url.set_scheme(scheme).map_err(|()| {
            ProviderError::InvalidConfig(format!("Cannot rewrite scheme of {raw}"))
        })?;
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn signer() -> TokenSigner {
        TokenSigner::new("key", "secret", Duration::from_secs(60)).unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("wss://media.example.com").unwrap(), "https://media.example.com");
        assert_eq!(normalize_base_url("ws://localhost:7880/").unwrap(), "http://localhost:7880");
        assert_eq!(normalize_base_url("https://x.io/base/").unwrap(), "https://x.io/base");
        assert!(normalize_base_url("ftp://x.io").is_err());
        assert!(normalize_base_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_call_decodes_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/twirp/livekit.RoomService/ListRooms"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rooms": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TwirpClient::new(&server.uri(), signer(), Duration::from_secs(5)).unwrap();
        let resp: serde_json::Value = client
            .call("livekit.RoomService", "ListRooms", VideoGrant::room_list(), &json!({}))
            .await
            .unwrap();

        assert_eq!(resp, json!({ "rooms": [] }));
    }

    #[tokio::test]
    async fn test_call_maps_twirp_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "code": "not_found", "msg": "room not found" })),
            )
            .mount(&server)
            .await;

        let client = TwirpClient::new(&server.uri(), signer(), Duration::from_secs(5)).unwrap();
        let err = client
            .call::<_, serde_json::Value>("livekit.RoomService", "DeleteRoom", VideoGrant::room_create(), &json!({}))
            .await
            .unwrap_err();

        match err {
            ProviderError::Twirp { status, code, msg } => {
                assert_eq!(status, 404);
                assert_eq!(code, "not_found");
                assert_eq!(msg, "room not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_call_maps_non_json_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = TwirpClient::new(&server.uri(), signer(), Duration::from_secs(5)).unwrap();
        let err = client
            .call::<_, serde_json::Value>("livekit.Ingress", "ListIngress", VideoGrant::ingress_admin(), &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some("unknown"));
    }
}
