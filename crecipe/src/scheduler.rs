use std::time::{Duration, Instant};

use crecipe_core::ItemStack;
use crecipe_inventory::GridId;
use crecipe_registry::RecipeId;

/// Ticks after a single craft before the crafted item lands on the cursor.
pub const CURSOR_RETURN_DELAY: u64 = 10;

/// Work the crafting pipeline postpones until the host has finished the current event.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Takes `amount` items out of input slot `slot`.
    ConsumeFromSlot {
        grid: GridId,
        slot: usize,
        amount: u32,
        bucket_consume: bool,
    },
    /// Empties the result unless the grid still satisfies `recipe`.
    RecheckResult { grid: GridId, recipe: RecipeId },
    /// Puts `item` on the cursor if the cursor is still empty.
    ReturnToCursor { grid: GridId, item: ItemStack },
}

impl Task {
    pub fn grid(&self) -> GridId {
        match self {
            Self::ConsumeFromSlot { grid, .. }
            | Self::RecheckResult { grid, .. }
            | Self::ReturnToCursor { grid, .. } => *grid,
        }
    }
}

/// Tick-based deferred task queue. Tasks due on the same tick run in the order they were scheduled.
#[derive(Debug, Default)]
pub struct Scheduler {
    current_tick: u64,
    queue: Vec<(u64, Task)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Runs `task` on the next tick.
    pub fn run_next_tick(&mut self, task: Task) {
        self.run_later(1, task);
    }

    /// Runs `task` `ticks` ticks from now, at least on the next tick.
    pub fn run_later(&mut self, ticks: u64, task: Task) {
        self.queue.push((self.current_tick + ticks.max(1), task));
    }

    /// Advances one tick and hands out every task that became due.
    pub fn tick(&mut self) -> Vec<Task> {
        self.current_tick += 1;
        let now = self.current_tick;
        let (due, waiting): (Vec<_>, Vec<_>) = self.queue.drain(..).partition(|(at, _)| *at <= now);
        self.queue = waiting;
        due.into_iter().map(|(_, task)| task).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drops the tasks of a grid that was closed.
    pub fn cancel_grid(&mut self, grid: GridId) {
        self.queue.retain(|(_, task)| task.grid() != grid);
    }
}

/// Calls `tick` at a fixed rate, for hosts without a tick loop of their own.
pub struct Ticker {
    tick_interval: Duration,
    last_tick: Instant,
}

impl Ticker {
    pub fn new(tps: f32) -> Self {
        Self {
            tick_interval: Duration::from_millis((1000.0 / tps) as u64),
            last_tick: Instant::now(),
        }
    }

    /// Blocks until the next tick is due, then runs `tick`. Run this in its own thread.
    pub fn run_once(&mut self, tick: impl FnOnce()) {
        let elapsed = self.last_tick.elapsed();
        if elapsed < self.tick_interval {
            // Wait for the remaining time until the next tick
            std::thread::sleep(self.tick_interval - elapsed);
        }
        tick();
        self.last_tick = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recheck(grid: u32) -> Task {
        Task::RecheckResult {
            grid: GridId(grid),
            recipe: RecipeId::from("sword"),
        }
    }

    #[test]
    fn next_tick_tasks_run_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.run_next_tick(recheck(1));
        scheduler.run_next_tick(recheck(2));
        assert_eq!(scheduler.pending(), 2);

        assert_eq!(scheduler.tick(), [recheck(1), recheck(2)]);
        assert!(scheduler.tick().is_empty());
        assert_eq!(scheduler.current_tick(), 2);
    }

    #[test]
    fn delayed_tasks_wait() {
        let mut scheduler = Scheduler::new();
        scheduler.run_later(CURSOR_RETURN_DELAY, recheck(1));
        scheduler.run_next_tick(recheck(2));

        assert_eq!(scheduler.tick(), [recheck(2)]);
        for _ in 1..CURSOR_RETURN_DELAY - 1 {
            assert!(scheduler.tick().is_empty());
        }
        assert_eq!(scheduler.tick(), [recheck(1)]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn zero_delay_still_waits_a_tick() {
        let mut scheduler = Scheduler::new();
        scheduler.run_later(0, recheck(1));
        assert_eq!(scheduler.tick(), [recheck(1)]);
    }

    #[test]
    fn cancel_closed_grid() {
        let mut scheduler = Scheduler::new();
        scheduler.run_next_tick(recheck(1));
        scheduler.run_later(5, recheck(2));
        scheduler.cancel_grid(GridId(1));
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn ticker_runs_callback() {
        let mut ticker = Ticker::new(1000.0);
        let mut ticks = 0;
        ticker.run_once(|| ticks += 1);
        ticker.run_once(|| ticks += 1);
        assert_eq!(ticks, 2);
    }
}
