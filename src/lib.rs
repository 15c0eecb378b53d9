//! 그림 맞히기 게임 세션 서버
//!
//! 참가자 입장/퇴장, 턴 순서, 이벤트 기록을 하나의 세션으로 관리하고
//! 열린 모든 WebSocket 연결에 일관된 상태를 브로드캐스트한다.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod state;

pub use config::Config;
pub use state::AppState;
