use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fintable_core::{CsvOptions, ExportedTable, TableType, classify_table, export_grid};

use crate::collector::{CancelToken, CollectOptions, CollectOutcome, collect_rows};
use crate::error::CollectError;
use crate::models::{ContentRequest, ContentResponse, ErrorResponse, ProgressEvent, TableSummary};
use crate::surface::ScrollSurface;

/// Cloneable control over a session's running collection, for the flow
/// that receives cancel requests while the session is busy.
#[derive(Debug, Clone, Default)]
pub struct CollectionHandle {
    token: CancelToken,
    active: Arc<AtomicBool>,
}

impl CollectionHandle {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Asks the running collection to stop at its next step. Returns `false`
    /// and drops the request when nothing is running.
    pub fn cancel(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.token.cancel();
        true
    }
}

/// Clears the active flag when a collection ends, including when its future
/// is dropped mid-run.
struct ActiveGuard<'a>(&'a AtomicBool);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The tables of one page plus the single collection slot for that page.
#[derive(Debug)]
pub struct ContentSession<S> {
    tables: Vec<S>,
    collect_options: CollectOptions,
    csv_options: CsvOptions,
    control: CollectionHandle,
}

impl<S> ContentSession<S>
where
    S: ScrollSurface,
{
    pub fn new(tables: Vec<S>) -> Self {
        Self {
            tables,
            collect_options: CollectOptions::default(),
            csv_options: CsvOptions::default(),
            control: CollectionHandle::default(),
        }
    }

    #[must_use]
    pub fn with_collect_options(mut self, options: CollectOptions) -> Self {
        self.collect_options = options;
        self
    }

    #[must_use]
    pub fn with_csv_options(mut self, options: CsvOptions) -> Self {
        self.csv_options = options;
        self
    }

    /// Handle for stopping the running collection from another flow.
    pub fn cancel_handle(&self) -> CollectionHandle {
        self.control.clone()
    }

    /// See [`CollectionHandle::cancel`].
    pub fn cancel(&self) -> bool {
        self.control.cancel()
    }

    /// `(document position, type)` of every classified table. Recomputed on
    /// each request because the page may have changed since the last one.
    fn classified(&self) -> Vec<(usize, TableType)> {
        self.tables
            .iter()
            .enumerate()
            .map(|(position, table)| (position, classify_table(table)))
            .filter(|(_, table_type)| *table_type != TableType::Unclassified)
            .collect()
    }

    fn resolve(&self, index: usize) -> Result<(usize, TableType), CollectError> {
        let classified = self.classified();
        classified
            .get(index)
            .copied()
            .ok_or(CollectError::InvalidTableIndex {
                index,
                available: classified.len(),
            })
    }

    pub fn scan(&self) -> Vec<TableSummary> {
        self.classified()
            .into_iter()
            .enumerate()
            .map(|(index, (position, table_type))| {
                let rows = self.tables[position].rows();
                TableSummary {
                    index,
                    table_type,
                    row_count: rows.len(),
                    column_count: rows.iter().map(Vec::len).max().unwrap_or(0),
                }
            })
            .collect()
    }

    /// Exports whatever the table currently renders, without scrolling.
    pub fn export(&self, index: usize) -> Result<ExportedTable, CollectError> {
        let (position, table_type) = self.resolve(index)?;
        let grid = self.tables[position].read_grid()?;
        let mut warnings = Vec::new();
        let table = export_grid(&grid, table_type, index, &self.csv_options, &mut warnings)?;
        for warning in &warnings {
            tracing::debug!(code = ?warning.code, count = ?warning.count, "{}", warning.message);
        }
        Ok(table)
    }

    /// Scrolls the table at `index` to the end and exports everything it
    /// rendered. Every outcome, failures included, ends with a terminal
    /// progress event.
    pub async fn collect<F>(
        &mut self,
        index: usize,
        mut on_progress: F,
    ) -> Result<ExportedTable, CollectError>
    where
        F: FnMut(ProgressEvent),
    {
        self.control.token.reset();
        self.control.active.store(true, Ordering::SeqCst);
        let active = Arc::clone(&self.control.active);
        let guard = ActiveGuard(&active);

        let mut last = (0_u8, 0_usize);
        let result = {
            let mut forward = |event: ProgressEvent| {
                last = (event.progress_percent, event.rows_collected);
                on_progress(event);
            };
            self.run_collection(index, &mut forward).await
        };
        drop(guard);

        match result {
            Ok((table, rows_collected)) => {
                on_progress(ProgressEvent::complete(rows_collected, table.csv.clone()));
                Ok(table)
            }
            Err(error) if error.is_cancellation() => Err(error),
            Err(error) => {
                tracing::warn!(code = error.code(), "collection failed: {}", error.message());
                on_progress(ProgressEvent::error(last.0, last.1, error.message()));
                Err(error)
            }
        }
    }

    async fn run_collection<F>(
        &mut self,
        index: usize,
        on_progress: &mut F,
    ) -> Result<(ExportedTable, usize), CollectError>
    where
        F: FnMut(ProgressEvent),
    {
        let (position, table_type) = self.resolve(index)?;
        let options = self.collect_options.clone();
        let cancel = self.control.token.clone();
        let csv_options = self.csv_options;
        let available = self.tables.len();
        let surface = self
            .tables
            .get_mut(position)
            .ok_or(CollectError::InvalidTableIndex { index, available })?;

        match collect_rows(surface, &options, &cancel, on_progress).await? {
            CollectOutcome::Cancelled { rows_collected } => {
                Err(CollectError::Cancelled { rows_collected })
            }
            CollectOutcome::Complete(rows) => {
                let mut warnings = Vec::new();
                let table = export_grid(&rows, table_type, index, &csv_options, &mut warnings)?;
                Ok((table, rows.len()))
            }
        }
    }

    pub async fn handle<F>(&mut self, request: ContentRequest, on_progress: F) -> ContentResponse
    where
        F: FnMut(ProgressEvent),
    {
        match request {
            ContentRequest::ScanTables => ContentResponse::Tables {
                tables: self.scan(),
            },
            ContentRequest::ExportTable { index } => match self.export(index) {
                Ok(table) => ContentResponse::Export { table },
                Err(error) => error_response(&error),
            },
            ContentRequest::CollectAll { index } => match self.collect(index, on_progress).await {
                Ok(table) => ContentResponse::Export { table },
                Err(error) => error_response(&error),
            },
            ContentRequest::CancelCollection => ContentResponse::Cancelled {
                cancelled: self.cancel(),
            },
        }
    }
}

fn error_response(error: &CollectError) -> ContentResponse {
    ContentResponse::Error(ErrorResponse {
        code: error.code().to_string(),
        message: error.message(),
    })
}
