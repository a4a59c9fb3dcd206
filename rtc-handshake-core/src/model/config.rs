use crate::utils::{
    DEFAULT_EVENT_BUFFER, DEFAULT_GATHERING_TIMEOUT, DEFAULT_OPERATION_TIMEOUT, DEFAULT_STUN_ADDR,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<&IceServerConfig> for webrtc::ice_transport::ice_server::RTCIceServer {
    fn from(server: &IceServerConfig) -> Self {
        Self {
            urls: server.urls.clone(),
            username: server.username.clone().unwrap_or_default(),
            credential: server.credential.clone().unwrap_or_default(),
            ..Default::default()
        }
    }
}

/// Settings a coordinator is constructed with.
///
/// The ice server list is handed to the transport unmodified. An empty list means no
/// connectivity-helper servers at all, which restricts gathering to host candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub ice_servers: Vec<IceServerConfig>,

    /// Upper bound on the wait for candidate gathering to finish. `None` waits forever.
    #[serde(with = "millis")]
    pub gathering_timeout: Option<Duration>,

    /// Upper bound on each individual description call into the transport.
    #[serde(with = "millis")]
    pub operation_timeout: Option<Duration>,

    /// Capacity of the transport -> coordinator notification queue.
    pub event_buffer: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::new(DEFAULT_STUN_ADDR)],
            gathering_timeout: Some(DEFAULT_GATHERING_TIMEOUT),
            operation_timeout: Some(DEFAULT_OPERATION_TIMEOUT),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl CoordinatorConfig {
    /// Configuration without helper servers, for loopback and LAN use.
    pub fn host_only() -> Self {
        Self {
            ice_servers: Vec::new(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<&CoordinatorConfig> for webrtc::peer_connection::configuration::RTCConfiguration {
    fn from(config: &CoordinatorConfig) -> Self {
        Self {
            ice_servers: config.ice_servers.iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
