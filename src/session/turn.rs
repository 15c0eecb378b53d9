//! 턴 진행 상태 머신
//!
//! `Idle` → `start` → `Active` → (`advance`)* → `reset` → `Idle`.
//! 타이머는 직접 돌리지 않는다. 외부에서 올라온 턴 종료/시간 초과 신호에만 반응한다.

use crate::error::SessionError;
use rand::seq::SliceRandom;
use rand::Rng;

/// 라운드 시작 제시어 후보
pub const PROMPT_CHARS: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Active,
}

/// `next_turn` 알림 내용
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSnapshot {
    pub current_turn: String,
    pub turn_order: Vec<String>,
    pub round: u32,
}

/// `start` 알림 내용과 첫 번째 턴
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStart {
    pub first_char: char,
    pub turn_order: Vec<String>,
    pub round: u32,
    pub first_turn: TurnSnapshot,
}

#[derive(Debug)]
pub struct TurnCoordinator {
    phase: TurnPhase,
    turn_order: Vec<String>,
    current: usize,
    round: u32,
    /// 턴이 바뀔 때마다 증가. 서버 타이머가 자신이 건 턴인지 확인하는 데 쓴다.
    serial: u64,
}

impl Default for TurnCoordinator {
    fn default() -> Self {
        Self {
            phase: TurnPhase::Idle,
            turn_order: Vec::new(),
            current: 0,
            round: 1,
            serial: 0,
        }
    }
}

impl TurnCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 참가자 스냅샷을 섞어 턴 순서를 정하고 라운드를 시작한다
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        mut participants: Vec<String>,
        rng: &mut R,
    ) -> Result<RoundStart, SessionError> {
        if self.phase == TurnPhase::Active {
            return Err(SessionError::AlreadyActive);
        }
        if participants.is_empty() {
            return Err(SessionError::NoParticipants);
        }

        // 집합 순회 순서에 의존하지 않도록 정렬 후 섞는다
        participants.sort();
        participants.shuffle(rng);
        let first_char = *PROMPT_CHARS.choose(rng).unwrap_or(&'a');

        Ok(self.begin(participants, first_char))
    }

    pub(crate) fn begin(&mut self, turn_order: Vec<String>, first_char: char) -> RoundStart {
        self.turn_order = turn_order;
        self.current = 0;
        self.round = 1;
        self.phase = TurnPhase::Active;
        self.serial += 1;

        RoundStart {
            first_char,
            turn_order: self.turn_order.clone(),
            round: self.round,
            first_turn: self.snapshot(),
        }
    }

    /// 다음 플레이어로 넘긴다. 순서가 한 바퀴 돌면 라운드가 올라간다.
    pub fn advance(&mut self) -> Result<TurnSnapshot, SessionError> {
        if self.phase != TurnPhase::Active {
            return Err(SessionError::NotActive);
        }
        if self.turn_order.is_empty() {
            return Err(SessionError::EmptyTurnOrder);
        }

        self.current = (self.current + 1) % self.turn_order.len();
        if self.current == 0 {
            self.round += 1;
        }
        self.serial += 1;

        Ok(self.snapshot())
    }

    /// 나간 참가자를 턴 순서에서 뺀다.
    ///
    /// 현재 턴의 주인이 나갔다면 다음 플레이어에게 턴이 넘어가고 그 내용을 돌려준다.
    /// 순서가 비면 `Idle`로 돌아간다.
    pub fn remove_participant(&mut self, id: &str) -> Option<TurnSnapshot> {
        if self.phase != TurnPhase::Active {
            return None;
        }
        let pos = self.turn_order.iter().position(|p| p == id)?;
        self.turn_order.remove(pos);

        if self.turn_order.is_empty() {
            self.reset();
            return None;
        }

        if pos < self.current {
            self.current -= 1;
            None
        } else if pos == self.current {
            if self.current >= self.turn_order.len() {
                self.current = 0;
                self.round += 1;
            }
            self.serial += 1;
            Some(self.snapshot())
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.turn_order.clear();
        self.current = 0;
        self.round = 1;
        self.phase = TurnPhase::Idle;
        self.serial += 1;
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn_order(&self) -> &[String] {
        &self.turn_order
    }

    pub fn current_turn(&self) -> Option<&str> {
        self.turn_order.get(self.current).map(String::as_str)
    }

    fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            current_turn: self.current_turn().unwrap_or_default().to_string(),
            turn_order: self.turn_order.clone(),
            round: self.round,
        }
    }
}
