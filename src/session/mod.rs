//! 게임 세션 집합체
//!
//! 참가자 집합, 이벤트 기록, 턴 상태를 하나로 묶는다. `AppState`가 하나의 락 안에 보관한다.

pub mod history;
pub mod participants;
pub mod turn;

pub use history::EventHistory;
pub use participants::ParticipantSet;
pub use turn::{RoundStart, TurnCoordinator, TurnPhase, TurnSnapshot};

#[derive(Debug, Default)]
pub struct Session {
    pub participants: ParticipantSet,
    pub history: EventHistory,
    pub turns: TurnCoordinator,
}

impl Session {
    pub fn new() -> Self {
        Self {
            participants: ParticipantSet::new(),
            history: EventHistory::new(),
            turns: TurnCoordinator::new(),
        }
    }

    /// 마지막 참가자가 나갔을 때 전체 초기화
    pub fn reset(&mut self) {
        self.participants.clear();
        self.history.clear();
        self.turns.reset();
    }

    pub fn is_pristine(&self) -> bool {
        self.participants.is_empty()
            && self.history.is_empty()
            && self.turns.phase() == TurnPhase::Idle
    }
}
