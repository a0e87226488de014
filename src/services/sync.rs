//! Tab-to-tab messages over a same-origin `BroadcastChannel`.
//!
//! Delivery is fire-and-forget: no acknowledgment, no retry, and a tab
//! opened after a post never sees it.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{BroadcastChannel, MessageEvent};

use crate::error::{BotWaveError, Result};
use crate::models::{ChatMessage, ChatSession, UserProfile};

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type")]
pub enum SyncEvent {
    /// Append `data` to one session. Receivers drop it when `sender_id` is their own.
    #[serde(rename = "NEW_MESSAGE", rename_all = "camelCase")]
    NewMessage {
        session_id: String,
        data: ChatMessage,
        sender_id: String,
    },
    /// Full snapshot; receivers overwrite their whole collection (last writer wins).
    #[serde(rename = "SYNC_SESSIONS")]
    SyncSessions { data: Vec<ChatSession> },
    #[serde(rename = "USER_UPDATE")]
    UserUpdate { user: UserProfile },
}

impl SyncEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SyncEvent::NewMessage { .. } => "NEW_MESSAGE",
            SyncEvent::SyncSessions { .. } => "SYNC_SESSIONS",
            SyncEvent::UserUpdate { .. } => "USER_UPDATE",
        }
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Payloads from other builds or foreign scripts are dropped.
    pub fn decode(payload: &str) -> Option<Self> {
        match serde_json::from_str(payload) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!("dropping undecodable sync payload: {}", e);
                None
            }
        }
    }
}

pub trait SyncTransport {
    fn post(&self, event: &SyncEvent);
    fn close(&self);
}

pub struct BroadcastChannelTransport {
    channel: BroadcastChannel,
    on_message: RefCell<Option<Closure<dyn FnMut(MessageEvent)>>>,
}

impl BroadcastChannelTransport {
    pub fn open(name: &str) -> Result<Self> {
        let channel =
            BroadcastChannel::new(name).map_err(|e| BotWaveError::Channel(format!("{:?}", e)))?;
        Ok(Self {
            channel,
            on_message: RefCell::new(None),
        })
    }

    /// Replaces any previous listener.
    pub fn subscribe(&self, callback: impl Fn(SyncEvent) + 'static) {
        let closure = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(payload) = event.data().as_string() else {
                tracing::warn!("ignoring non-string sync payload");
                return;
            };
            if let Some(event) = SyncEvent::decode(&payload) {
                callback(event);
            }
        });
        self.channel
            .set_onmessage(Some(closure.as_ref().unchecked_ref()));
        *self.on_message.borrow_mut() = Some(closure);
    }
}

impl SyncTransport for BroadcastChannelTransport {
    fn post(&self, event: &SyncEvent) {
        let posted = event.encode().and_then(|json| {
            self.channel
                .post_message(&JsValue::from_str(&json))
                .map_err(|e| BotWaveError::Channel(format!("{:?}", e)))
        });
        match posted {
            Ok(()) => tracing::debug!("posted {}", event.kind()),
            Err(e) => tracing::warn!("failed to post {}: {}", event.kind(), e),
        }
    }

    fn close(&self) {
        self.channel.set_onmessage(None);
        self.channel.close();
        self.on_message.borrow_mut().take();
    }
}

#[cfg(test)]
pub use loopback::{LoopbackHub, LoopbackTransport};


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageContent, MessageRole};

    fn message() -> ChatMessage {
        ChatMessage {
            id: "m1".into(),
            role: MessageRole::Bot,
            content: MessageContent {
                text: Some("hello".into()),
                ..Default::default()
            },
            timestamp: 5.0,
        }
    }

    #[test]
    fn new_message_wire_shape() {
        let event = SyncEvent::NewMessage {
            session_id: "s1".into(),
            data: message(),
            sender_id: "u1".into(),
        };
        let value: serde_json::Value = serde_json::from_str(&event.encode().unwrap()).unwrap();
        assert_eq!(value["type"], "NEW_MESSAGE");
        assert_eq!(value["sessionId"], "s1");
        assert_eq!(value["senderId"], "u1");
        assert_eq!(value["data"]["content"]["text"], "hello");
    }

    #[test]
    fn decodes_sync_sessions() {
        let event = SyncEvent::decode(r#"{"type":"SYNC_SESSIONS","data":[]}"#);
        assert_eq!(event, Some(SyncEvent::SyncSessions { data: vec![] }));
    }

    #[test]
    fn unknown_payload_is_dropped() {
        assert!(SyncEvent::decode(r#"{"type":"PING"}"#).is_none());
        assert!(SyncEvent::decode("garbage").is_none());
    }

    #[test]
    fn loopback_delivers_to_sender_too() {
        let hub = LoopbackHub::default();
        let a = hub.connect();
        let b = hub.connect();
        a.post(&SyncEvent::SyncSessions { data: vec![] });
        assert_eq!(a.pending(), 1);
        assert_eq!(b.drain(), vec![SyncEvent::SyncSessions { data: vec![] }]);
    }

    #[test]
    fn closed_transport_stops_posting() {
        let hub = LoopbackHub::default();
        let a = hub.connect();
        let b = hub.connect();
        a.close();
        a.post(&SyncEvent::SyncSessions { data: vec![] });
        assert_eq!(b.pending(), 0);
    }
}
