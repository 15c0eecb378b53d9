//! 애플리케이션 상태 관리

use crate::config::Config;
use crate::registry::ConnectionRegistry;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 전역 애플리케이션 상태
pub struct AppState {
    /// 연결 정보 (conn_id -> Connection)
    pub connections: ConnectionRegistry,
    /// 게임 세션. 모든 세션 변경과 그에 따른 브로드캐스트는 이 락 안에서 수행한다.
    pub session: Mutex<Session>,
    /// 설정
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            connections: ConnectionRegistry::new(),
            session: Mutex::new(Session::new()),
            config: Arc::new(config),
        }
    }
}
