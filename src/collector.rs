use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use fintable_core::{Grid, Row};
use serde::Deserialize;

use crate::error::CollectError;
use crate::models::ProgressEvent;
use crate::surface::{ScrollSurface, find_scroll_target};

/// Joins row fields into the dedup key. Distinct rows that join to the same
/// key collapse into one.
pub const ROW_KEY_DELIMITER: &str = "|";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectOptions {
    /// Share of the visible height advanced per step.
    pub step_fraction: f64,
    /// Render wait after each step.
    pub step_delay_ms: u64,
    /// Extra wait at the bottom for trailing async rows.
    pub final_delay_ms: u64,
    pub max_attempts: usize,
    /// Consecutive steps without a new row before giving up.
    pub max_idle_attempts: usize,
    pub bottom_tolerance_px: f64,
}

impl CollectOptions {
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub const fn final_delay(&self) -> Duration {
        Duration::from_millis(self.final_delay_ms)
    }
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            step_fraction: 0.8,
            step_delay_ms: 400,
            final_delay_ms: 1500,
            max_attempts: 500,
            max_idle_attempts: 10,
            bottom_tolerance_px: 5.0,
        }
    }
}

/// Cooperative cancellation flag, checked once per scroll step.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub fn row_key(row: &[String]) -> String {
    row.join(ROW_KEY_DELIMITER)
}

/// State of one collection run: unique rows in first-seen order plus the
/// step counters.
#[derive(Debug, Default)]
pub struct ScrollSession {
    seen: HashSet<String>,
    rows: Grid,
    attempts: usize,
    idle_attempts: usize,
}

impl ScrollSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds unseen rows, returns how many were new.
    pub fn merge(&mut self, grid: Grid) -> usize {
        let before = self.rows.len();
        for row in grid {
            if self.seen.insert(row_key(&row)) {
                self.rows.push(row);
            }
        }
        self.rows.len() - before
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectOutcome {
    Complete(Grid),
    Cancelled { rows_collected: usize },
}

/// Scrolls the table's container step by step and accumulates every row
/// the host renders along the way.
///
/// Stops at the bottom (after one more wait and read), after
/// `max_idle_attempts` steps in a row add nothing, or after `max_attempts`
/// steps. Emits `Collecting` after every step and `Cancelled` when the token
/// is set; the terminal `Complete` event is left to the caller, which owns
/// the payload.
pub async fn collect_rows<S, F>(
    surface: &mut S,
    options: &CollectOptions,
    cancel: &CancelToken,
    on_progress: &mut F,
) -> Result<CollectOutcome, CollectError>
where
    S: ScrollSurface,
    F: FnMut(ProgressEvent),
{
    let target = find_scroll_target(&*surface);
    tracing::debug!(?target, "scroll target resolved");

    let mut session = ScrollSession::new();
    session.merge(surface.read_grid()?);
    let mut last_percent = 0;

    while session.attempts < options.max_attempts
        && session.idle_attempts < options.max_idle_attempts
    {
        if cancel.is_cancelled() {
            tracing::info!(rows = session.row_count(), "collection cancelled");
            on_progress(ProgressEvent::cancelled(last_percent, session.row_count()));
            return Ok(CollectOutcome::Cancelled {
                rows_collected: session.row_count(),
            });
        }

        session.attempts += 1;
        let before = surface.metrics(target)?;
        let next_top = before.scroll_top + before.client_height * options.step_fraction;
        surface.scroll_to(target, next_top)?;
        surface.sleep(options.step_delay()).await;

        let added = session.merge(surface.read_grid()?);
        let after = surface.metrics(target)?;
        last_percent = after.progress_percent();
        on_progress(ProgressEvent::collecting(last_percent, session.row_count()));
        tracing::debug!(
            attempt = session.attempts,
            added,
            rows = session.row_count(),
            percent = last_percent,
            "scroll step"
        );

        if after.at_bottom(options.bottom_tolerance_px) {
            surface.sleep(options.final_delay()).await;
            session.merge(surface.read_grid()?);
            tracing::debug!(rows = session.row_count(), "reached bottom");
            break;
        }

        if added == 0 {
            session.idle_attempts += 1;
        } else {
            session.idle_attempts = 0;
        }
    }

    tracing::info!(
        attempts = session.attempts(),
        rows = session.row_count(),
        "collection finished"
    );
    Ok(CollectOutcome::Complete(session.into_rows()))
}

#[cfg(test)]
mod tests {
    use super::{CancelToken, CollectOptions, ScrollSession, row_key};

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_string()).collect()
    }

    #[test]
    fn merge_counts_only_unseen_rows() {
        let mut session = ScrollSession::new();
        assert_eq!(session.merge(vec![row(&["a", "1"]), row(&["b", "2"])]), 2);
        assert_eq!(session.merge(vec![row(&["b", "2"]), row(&["c", "3"])]), 1);
        assert_eq!(
            session.into_rows(),
            vec![row(&["a", "1"]), row(&["b", "2"]), row(&["c", "3"])]
        );
    }

    #[test]
    fn key_joins_fields_with_delimiter() {
        assert_eq!(row_key(&row(&["2024-01-02", "1.5"])), "2024-01-02|1.5");
    }

    #[test]
    fn token_reset_clears_cancellation() {
        let token = CancelToken::new();
        let handle = token.clone();
        handle.cancel();
        assert!(token.is_cancelled());
        token.reset();
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: CollectOptions =
            serde_json::from_str(r#"{"maxIdleAttempts":3,"stepDelayMs":50}"#)
                .expect("options should parse");
        assert_eq!(options.max_idle_attempts, 3);
        assert_eq!(options.step_delay_ms, 50);
        assert_eq!(options.max_attempts, CollectOptions::default().max_attempts);
    }
}
