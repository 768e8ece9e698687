//! Scripted progress indicator shown while an analysis is running.
//!
//! The backend reports no real progress, so the indicator walks a fixed list
//! of steps on a timer. A script is plain data: [`ProgressScript::frame_at`]
//! says what should be on screen at any elapsed time, and
//! [`ProgressScript::play`] drives the same schedule in a task that can be
//! cancelled and replayed.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressStep {
    pub percent: u8,
    pub label: String,
}

const ANALYSIS_STEPS: &[(u8, &str)] = &[
    (10, "Fetching article..."),
    (25, "Extracting content..."),
    (40, "Checking source credibility..."),
    (55, "Analyzing author..."),
    (70, "Detecting bias and emotional tone..."),
    (85, "Fact-checking claims..."),
    (95, "Compiling report..."),
];

#[derive(Debug, Clone)]
pub struct ProgressScript {
    steps: Vec<ProgressStep>,
    interval: Duration,
}

impl ProgressScript {
    pub fn new(steps: Vec<ProgressStep>, interval: Duration) -> Self {
        Self { steps, interval }
    }

    /// The article analysis script, one step every `interval`.
    pub fn analysis(interval: Duration) -> Self {
        let steps = ANALYSIS_STEPS
            .iter()
            .map(|(percent, label)| ProgressStep { percent: *percent, label: label.to_string() })
            .collect();
        Self::new(steps, interval)
    }

    pub fn steps(&self) -> &[ProgressStep] {
        &self.steps
    }

    /// Step on screen after `elapsed`. The last step holds once reached.
    pub fn frame_at(&self, elapsed: Duration) -> Option<&ProgressStep> {
        let last = self.steps.len().checked_sub(1)?;
        let index = if self.interval.is_zero() {
            last
        } else {
            (elapsed.as_nanos() / self.interval.as_nanos()).min(last as u128) as usize
        };
        self.steps.get(index)
    }

    /// Emit each step on schedule from a spawned task.
    pub fn play<F>(&self, emit: F) -> ProgressRun
    where
        F: Fn(&ProgressStep) + Send + 'static,
    {
        let steps = self.steps.clone();
        let interval = self.interval;
        let started = Instant::now();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let task = tokio::spawn(async move {
            for (i, step) in steps.iter().enumerate() {
                let due = started + interval.saturating_mul(i as u32);
                tokio::time::sleep_until(due).await;
                if flag.load(Ordering::Acquire) {
                    return;
                }
                emit(step);
            }
        });

        ProgressRun { task, cancelled, started }
    }
}

/// One playback of a [`ProgressScript`]. Dropping it cancels playback.
#[derive(Debug)]
pub struct ProgressRun {
    task: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
    started: Instant,
}

impl ProgressRun {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop playback. Nothing is emitted after this returns.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.task.abort();
    }

    /// Keep the indicator up for at least `min_display` in total, then stop.
    pub async fn finish(self, min_display: Duration) {
        let remaining = min_display.saturating_sub(self.elapsed());
        if !remaining.is_zero() {
            tokio::time::sleep(remaining).await;
        }
        self.cancel();
    }
}

impl Drop for ProgressRun {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const STEP: Duration = Duration::from_millis(800);

    fn recorder() -> (Arc<Mutex<Vec<u8>>>, impl Fn(&ProgressStep) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |s: &ProgressStep| sink.lock().unwrap().push(s.percent))
    }

    #[test]
    fn test_frame_at_is_deterministic() {
        let script = ProgressScript::analysis(STEP);
        assert_eq!(script.frame_at(Duration::ZERO).unwrap().percent, 10);
        assert_eq!(script.frame_at(STEP - Duration::from_millis(1)).unwrap().percent, 10);
        assert_eq!(script.frame_at(STEP).unwrap().percent, 25);
        assert_eq!(script.frame_at(STEP * 3).unwrap().label, "Analyzing author...");
        assert_eq!(script.frame_at(Duration::from_secs(3600)).unwrap().percent, 95);
    }

    #[test]
    fn test_empty_script_has_no_frames() {
        let script = ProgressScript::new(Vec::new(), STEP);
        assert!(script.frame_at(Duration::from_secs(1)).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_follows_schedule() {
        let script = ProgressScript::analysis(STEP);
        let (seen, emit) = recorder();

        let run = script.play(emit);
        tokio::time::sleep(STEP * 2 + Duration::from_millis(10)).await;

        assert_eq!(*seen.lock().unwrap(), vec![10, 25, 40]);
        drop(run);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_run_emits_nothing_further() {
        let script = ProgressScript::analysis(STEP);
        let (seen, emit) = recorder();

        let run = script.play(emit);
        tokio::time::sleep(STEP + Duration::from_millis(10)).await;
        run.cancel();
        tokio::time::sleep(STEP * 20).await;

        assert_eq!(*seen.lock().unwrap(), vec![10, 25]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_is_replayable() {
        let script = ProgressScript::analysis(STEP);
        let (first, emit_a) = recorder();
        let (second, emit_b) = recorder();

        let a = script.play(emit_a);
        tokio::time::sleep(Duration::from_millis(10)).await;
        a.cancel();
        let b = script.play(emit_b);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(*first.lock().unwrap(), vec![10]);
        assert_eq!(*second.lock().unwrap(), vec![10]);
        drop(b);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_waits_for_minimum_display() {
        let script = ProgressScript::analysis(STEP);
        let (_seen, emit) = recorder();
        let start = Instant::now();

        let run = script.play(emit);
        run.finish(Duration::from_millis(1500)).await;

        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
