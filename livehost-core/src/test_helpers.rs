//! Recording fakes for the provisioning collaborators
//!
//! Every fake appends to a shared [`CallLog`] so tests can assert on the
//! order of remote calls across collaborators.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::cache::PageCache;
use crate::models::{
    CreateIngressOptions, IngressCredentials, IngressInfo, IngressInput, Room, Stream,
    UserId,
};
use crate::provider::error::{ProviderError, Result as ProviderResult};
use crate::provider::{IngressApi, RoomServiceApi};
use crate::repository::StreamStore;
use crate::Result;

/// Shared, ordered record of calls
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0.lock().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

pub fn unavailable() -> ProviderError {
    ProviderError::Twirp {
        status: 503,
        code: "unavailable".to_string(),
        msg: "provider unavailable".to_string(),
    }
}

pub fn room(name: &str) -> Room {
    Room {
        sid: format!("RM_{name}"),
        name: name.to_string(),
        ..Room::default()
    }
}

pub fn ingress(id: &str, room_name: &str) -> IngressInfo {
    IngressInfo {
        ingress_id: id.to_string(),
        room_name: room_name.to_string(),
        ..IngressInfo::default()
    }
}

/// Complete create-ingress response
pub fn created(id: &str, url: &str, stream_key: &str) -> IngressInfo {
    IngressInfo {
        ingress_id: id.to_string(),
        url: url.to_string(),
        stream_key: stream_key.to_string(),
        ..IngressInfo::default()
    }
}

/// Room service returning a fixed room list
#[derive(Default)]
pub struct FakeRoomService {
    pub log: CallLog,
    pub rooms: Vec<Room>,
    /// Failures handed out before `delete_room` starts succeeding
    pub delete_failures: Mutex<u32>,
}

impl FakeRoomService {
    pub fn new(log: CallLog, rooms: Vec<Room>) -> Self {
        Self {
            log,
            rooms,
            delete_failures: Mutex::new(0),
        }
    }
}

#[async_trait]
impl RoomServiceApi for FakeRoomService {
    async fn list_rooms(&self, names: Vec<String>) -> ProviderResult<Vec<Room>> {
        self.log.push(format!("list_rooms:{}", names.join(",")));
        Ok(self
            .rooms
            .iter()
            .filter(|r| names.contains(&r.name))
            .cloned()
            .collect())
    }

    async fn delete_room(&self, name: &str) -> ProviderResult<()> {
        self.log.push(format!("delete_room:{name}"));
        let mut failures = self.delete_failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(unavailable());
        }
        Ok(())
    }
}

/// Ingress service with scripted create responses
#[derive(Default)]
pub struct FakeIngressApi {
    pub log: CallLog,
    pub existing: Vec<IngressInfo>,
    /// Consumed in order; the last one repeats
    pub create_responses: Mutex<VecDeque<ProviderResult<IngressInfo>>>,
    pub created: Mutex<Vec<(IngressInput, CreateIngressOptions)>>,
}

impl FakeIngressApi {
    pub fn new(log: CallLog, existing: Vec<IngressInfo>, response: IngressInfo) -> Self {
        Self {
            log,
            existing,
            create_responses: Mutex::new(VecDeque::from([Ok(response)])),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Fail `count` creates before returning the configured response
    pub fn fail_creates(self, count: usize) -> Self {
        {
            let mut responses = self.create_responses.lock();
            for _ in 0..count {
                responses.push_front(Err(unavailable()));
            }
        }
        self
    }

    pub fn requests(&self) -> Vec<(IngressInput, CreateIngressOptions)> {
        self.created.lock().clone()
    }
}

#[async_trait]
impl IngressApi for FakeIngressApi {
    async fn list_ingress(&self, room_name: &str) -> ProviderResult<Vec<IngressInfo>> {
        self.log.push(format!("list_ingress:{room_name}"));
        Ok(self
            .existing
            .iter()
            .filter(|i| i.room_name == room_name)
            .cloned()
            .collect())
    }

    async fn delete_ingress(&self, ingress_id: &str) -> ProviderResult<IngressInfo> {
        self.log.push(format!("delete_ingress:{ingress_id}"));
        Ok(ingress(ingress_id, ""))
    }

    async fn create_ingress(
        &self,
        input: IngressInput,
        options: CreateIngressOptions,
    ) -> ProviderResult<IngressInfo> {
        self.log.push(format!("create_ingress:{}", options.room_name));
        self.created.lock().push((input, options));

        let mut responses = self.create_responses.lock();
        if responses.len() > 1 {
            responses.pop_front().unwrap_or_else(|| Err(unavailable()))
        } else {
            match responses.front() {
                Some(Ok(info)) => Ok(info.clone()),
                Some(Err(_)) | None => Err(unavailable()),
            }
        }
    }
}

/// Stream store remembering every update
#[derive(Default)]
pub struct FakeStreamStore {
    pub log: CallLog,
    pub updates: Mutex<Vec<(UserId, IngressCredentials)>>,
    pub streams: Mutex<Vec<Stream>>,
}

impl FakeStreamStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn updates(&self) -> Vec<(UserId, IngressCredentials)> {
        self.updates.lock().clone()
    }
}

#[async_trait]
impl StreamStore for FakeStreamStore {
    async fn update_ingress(&self, user_id: &UserId, credentials: &IngressCredentials) -> Result<()> {
        self.log.push(format!("update_ingress:{user_id}"));
        self.updates.lock().push((user_id.clone(), credentials.clone()));
        Ok(())
    }

    async fn get_by_user_id(&self, user_id: &UserId) -> Result<Option<Stream>> {
        Ok(self.streams.lock().iter().find(|s| &s.user_id == user_id).cloned())
    }
}

/// Page cache remembering invalidated paths
#[derive(Default)]
pub struct FakePageCache {
    pub log: CallLog,
    pub paths: Mutex<Vec<String>>,
}

impl FakePageCache {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            paths: Mutex::new(Vec::new()),
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().clone()
    }
}

#[async_trait]
impl PageCache for FakePageCache {
    async fn invalidate_path(&self, path: &str) -> Result<()> {
        self.log.push(format!("invalidate:{path}"));
        self.paths.lock().push(path.to_string());
        Ok(())
    }
}
