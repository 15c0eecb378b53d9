//! 연결 레지스트리
//!
//! 전송 계층 연결과, 입장 이후 연결에 묶인 참가자 ID를 관리한다.
//! 비즈니스 로직은 없다.

use dashmap::DashMap;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

pub type ConnectionId = String;

/// 연결 하나. 송신 태스크가 수신 측을 들고 있는 동안만 열려 있다.
pub struct Connection {
    pub id: ConnectionId,
    pub participant: Option<String>,
    pub sender: UnboundedSender<String>,
    pub connected_at: Instant,
}

impl Connection {
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// 브로드캐스트 한 번 동안 사용하는 연결 스냅샷
#[derive(Clone)]
pub struct LiveConnection {
    pub id: ConnectionId,
    sender: UnboundedSender<String>,
}

impl LiveConnection {
    /// 닫힌 연결로의 전송은 조용히 무시한다
    pub fn send(&self, frame: &str) -> bool {
        self.sender.send(frame.to_string()).is_ok()
    }
}

#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, sender: UnboundedSender<String>) -> ConnectionId {
        let id = Uuid::new_v4().to_string();
        self.connections.insert(
            id.clone(),
            Connection {
                id: id.clone(),
                participant: None,
                sender,
                connected_at: Instant::now(),
            },
        );
        id
    }

    pub fn unregister(&self, id: &str) -> Option<Connection> {
        self.connections.remove(id).map(|(_, conn)| conn)
    }

    /// 현재 열린 연결 목록. 순서는 보장하지 않는다.
    pub fn live_connections(&self) -> Vec<LiveConnection> {
        self.connections
            .iter()
            .filter(|entry| entry.is_open())
            .map(|entry| LiveConnection {
                id: entry.id.clone(),
                sender: entry.sender.clone(),
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<LiveConnection> {
        self.connections
            .get(id)
            .filter(|conn| conn.is_open())
            .map(|conn| LiveConnection {
                id: conn.id.clone(),
                sender: conn.sender.clone(),
            })
    }

    /// 연결에 참가자를 묶고 이전 참가자 ID를 돌려준다
    pub fn associate(&self, id: &str, participant: &str) -> Option<String> {
        self.connections
            .get_mut(id)
            .and_then(|mut conn| conn.participant.replace(participant.to_string()))
    }

    pub fn participant_of(&self, id: &str) -> Option<String> {
        self.connections
            .get(id)
            .and_then(|conn| conn.participant.clone())
    }

    pub fn dissociate(&self, id: &str) -> Option<String> {
        self.connections
            .get_mut(id)
            .and_then(|mut conn| conn.participant.take())
    }

    /// 같은 참가자 ID에 묶인 연결들
    pub fn connections_of(&self, participant: &str) -> Vec<ConnectionId> {
        self.connections
            .iter()
            .filter(|entry| entry.participant.as_deref() == Some(participant))
            .map(|entry| entry.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
