use serde::{Deserialize, Serialize};

/// 延迟执行的动作。核心从不等待，只登记、由宿主推进时钟后取出。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type")]
pub enum DeferredAction {
    RespawnMonster,
    NextProblem,
    EndDamageFlash,
}

pub type TimerId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub id: TimerId,
    pub due_at: u64,
    pub action: DeferredAction,
}

/// 基于虚拟毫秒时钟的定时器表。
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: u64,
    next_id: TimerId,
    timers: Vec<ScheduledTimer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, delay_ms: u32, action: DeferredAction) -> TimerId {
        self.next_id += 1;
        let timer = ScheduledTimer {
            id: self.next_id,
            due_at: self.now + u64::from(delay_ms),
            action,
        };
        tracing::debug!(id = timer.id, due_at = timer.due_at, ?action, "timer scheduled");
        self.timers.push(timer);
        self.next_id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    /// 取消所有满足条件的定时器，返回取消的数量。
    pub fn cancel_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&DeferredAction) -> bool,
    {
        let before = self.timers.len();
        self.timers.retain(|timer| !predicate(&timer.action));
        before - self.timers.len()
    }

    /// 推进时钟并按到期顺序返回到期的动作；同一时刻按登记顺序。
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<DeferredAction> {
        self.now += u64::from(elapsed_ms);
        let now = self.now;

        let mut due: Vec<ScheduledTimer> = Vec::new();
        self.timers.retain(|timer| {
            if timer.due_at <= now {
                due.push(timer.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|timer| (timer.due_at, timer.id));
        due.into_iter().map(|timer| timer.action).collect()
    }

    /// 距离最近一个定时器到期还有多少毫秒。
    pub fn next_due_in(&self) -> Option<u32> {
        self.timers
            .iter()
            .map(|timer| timer.due_at.saturating_sub(self.now))
            .min()
            .map(|delay| u32::try_from(delay).unwrap_or(u32::MAX))
    }

    pub fn pending(&self) -> &[ScheduledTimer] {
        &self.timers
    }

    pub fn is_pending(&self, action: DeferredAction) -> bool {
        self.timers.iter().any(|timer| timer.action == action)
    }
}
