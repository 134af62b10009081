use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::Result;
use super::token::VideoGrant;
use super::traits::RoomServiceApi;
use super::twirp::TwirpClient;
use crate::models::Room;

const SERVICE: &str = "livekit.RoomService";

#[derive(Debug, Serialize)]
struct ListRoomsRequest<'a> {
    names: &'a [String],
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListRoomsResponse {
    rooms: Vec<Room>,
}

#[derive(Debug, Serialize)]
struct DeleteRoomRequest<'a> {
    room: &'a str,
}

/// Room service client over Twirp
#[derive(Debug, Clone)]
pub struct RoomServiceClient {
    twirp: TwirpClient,
}

impl RoomServiceClient {
    #[must_use]
    pub const fn new(twirp: TwirpClient) -> Self {
        Self { twirp }
    }
}

#[async_trait]
impl RoomServiceApi for RoomServiceClient {
    async fn list_rooms(&self, names: Vec<String>) -> Result<Vec<Room>> {
        let resp: ListRoomsResponse = self
            .twirp
            .call(SERVICE, "ListRooms", VideoGrant::room_list(), &ListRoomsRequest { names: &names })
            .await?;
        Ok(resp.rooms)
    }

    async fn delete_room(&self, name: &str) -> Result<()> {
        let _: serde::de::IgnoredAny = self
            .twirp
            .call(SERVICE, "DeleteRoom", VideoGrant::room_create(), &DeleteRoomRequest { room: name })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::TokenSigner;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> RoomServiceClient {
        let signer = TokenSigner::new("key", "secret", Duration::from_secs(60)).unwrap();
        RoomServiceClient::new(TwirpClient::new(&server.uri(), signer, Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_list_rooms_filters_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/twirp/livekit.RoomService/ListRooms"))
            .and(body_json(json!({ "names": ["u1"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rooms": [{ "sid": "RM_1", "name": "u1", "num_participants": 2 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rooms = client(&server).await.list_rooms(vec!["u1".to_string()]).await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].name, "u1");
        assert_eq!(rooms[0].num_participants, 2);
    }

    #[tokio::test]
    async fn test_list_rooms_decodes_string_int64() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/twirp/livekit.RoomService/ListRooms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rooms": [{
                    "sid": "RM_1",
                    "name": "u1",
                    "num_participants": 0,
                    "creation_time": "1700000000",
                    "empty_timeout": 300
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rooms = client(&server).await.list_rooms(vec!["u1".to_string()]).await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].creation_time, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_list_rooms_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let rooms = client(&server).await.list_rooms(vec!["u1".to_string()]).await.unwrap();
        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn test_delete_room() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/twirp/livekit.RoomService/DeleteRoom"))
            .and(body_json(json!({ "room": "u1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).await.delete_room("u1").await.unwrap();
    }
}
