use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::Result;
use super::token::VideoGrant;
use super::traits::IngressApi;
use super::twirp::TwirpClient;
use crate::models::{CreateIngressOptions, IngressInfo, IngressInput};

const SERVICE: &str = "livekit.Ingress";

#[derive(Debug, Serialize)]
struct ListIngressRequest<'a> {
    room_name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListIngressResponse {
    items: Vec<IngressInfo>,
}

#[derive(Debug, Serialize)]
struct DeleteIngressRequest<'a> {
    ingress_id: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateIngressRequest {
    input_type: IngressInput,
    #[serde(flatten)]
    options: CreateIngressOptions,
}

/// Ingress client over Twirp
#[derive(Debug, Clone)]
pub struct IngressClient {
    twirp: TwirpClient,
}

impl IngressClient {
    #[must_use]
    pub const fn new(twirp: TwirpClient) -> Self {
        Self { twirp }
    }
}

#[async_trait]
impl IngressApi for IngressClient {
    async fn list_ingress(&self, room_name: &str) -> Result<Vec<IngressInfo>> {
        let resp: ListIngressResponse = self
            .twirp
            .call(SERVICE, "ListIngress", VideoGrant::ingress_admin(), &ListIngressRequest { room_name })
            .await?;
        Ok(resp.items)
    }

    async fn delete_ingress(&self, ingress_id: &str) -> Result<IngressInfo> {
        self.twirp
            .call(SERVICE, "DeleteIngress", VideoGrant::ingress_admin(), &DeleteIngressRequest { ingress_id })
            .await
    }

    async fn create_ingress(
        &self,
        input: IngressInput,
        options: CreateIngressOptions,
    ) -> Result<IngressInfo> {
        let request = CreateIngressRequest {
            input_type: input,
            options,
        };
        self.twirp
            .call(SERVICE, "CreateIngress", VideoGrant::ingress_admin(), &request)
            .await
    }
}
