//! Toggle bursts: одно нажатие → 10 tick-вызовов с шагом 0.1s, потом стоп
//!
//! Каждый down-репорт запускает свой burst (несколько могут идти параллельно).

use crate::config::Slot;

pub const BURST_INTERVAL: f32 = 0.1;
pub const BURST_TICKS: u32 = 10;

/// Допуск на неточное представление 0.1 в f32
const EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Burst {
    slot: Slot,
    started_at: f32,
    fired: u32,
}

#[derive(Debug, Clone, Default)]
pub struct BurstScheduler {
    active: Vec<Burst>,
}

impl BurstScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, slot: Slot, now: f32) {
        self.active.push(Burst {
            slot,
            started_at: now,
            fired: 0,
        });
    }

    /// Слоты, которым положен tick-вызов к моменту `now` (в порядке запуска).
    /// Если тик длиннее интервала — все пропущенные вызовы отдаются разом.
    pub fn due(&mut self, now: f32) -> Vec<Slot> {
        let mut slots = Vec::new();

        for burst in &mut self.active {
            while burst.fired < BURST_TICKS
                && now - burst.started_at + EPSILON >= BURST_INTERVAL * (burst.fired + 1) as f32
            {
                burst.fired += 1;
                slots.push(burst.slot);
            }
        }

        self.active.retain(|burst| burst.fired < BURST_TICKS);
        slots
    }

    pub fn is_active(&self, slot: Slot) -> bool {
        self.active.iter().any(|burst| burst.slot == slot)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
