//! The inline-editable records table.
//!
//! `RecordTable` owns the rows on screen and decides what each user action
//! means for the backend. The backend stays the source of truth: every
//! successful mutation is followed by a full refetch, and nothing is changed
//! locally until the server has agreed.

use crate::api::RecordsApi;
use crate::error::ApiError;
use crate::types::{RecordFields, RecordId, Row, UpdateRecord};

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no row at position {0}")]
    NoSuchRow(usize),
}

/// Table rows kept in step with a [`RecordsApi`].
///
/// Rows are in display order: the order of the last successful fetch, with
/// locally added rows appended at the end.
#[derive(Debug)]
pub struct RecordTable<A> {
    api: A,
    rows: Vec<Row>,
    editing: Option<usize>,
}

impl<A: RecordsApi> RecordTable<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            rows: Vec::new(),
            editing: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Position of the row currently in edit mode.
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    /// Fetch all records and replace the rows with them.
    ///
    /// On failure the rows keep their previous value.
    pub async fn initialize(&mut self) -> Result<(), TableError> {
        let records = self.api.list().await?;
        tracing::debug!(count = records.len(), "records fetched");
        self.rows = records.into_iter().map(Row::from).collect();
        self.editing = None;
        Ok(())
    }

    /// Append an unsaved row with default values and put it in edit mode.
    /// Returns its position.
    pub fn add_new_row(&mut self) -> usize {
        self.rows.push(Row::Unsaved(RecordFields::default()));
        let position = self.rows.len() - 1;
        self.editing = Some(position);
        position
    }

    pub fn begin_edit(&mut self, position: usize) -> Result<(), TableError> {
        let row = self.row(position)?;
        tracing::debug!(position, id = ?row.id(), "editing started");
        self.editing = Some(position);
        Ok(())
    }

    /// Mutable access to a row's editable values, as bound to the table inputs.
    pub fn fields_mut(&mut self, position: usize) -> Result<&mut RecordFields, TableError> {
        self.rows
            .get_mut(position)
            .map(Row::fields_mut)
            .ok_or(TableError::NoSuchRow(position))
    }

    /// Persist the row at `position` and refetch.
    ///
    /// Unsaved rows are created, persisted rows are updated with all of
    /// their editable fields. The refetch gives a newly created row its
    /// server id and timestamps.
    pub async fn save_edit(&mut self, position: usize) -> Result<(), TableError> {
        match self.row(position)? {
            Row::Unsaved(fields) => {
                let created = self.api.create(fields).await?;
                tracing::debug!(id = created.id, "record created");
            }
            Row::Persisted(record) => {
                let saved = self
                    .api
                    .update(record.id, &UpdateRecord::from(&record.fields))
                    .await?;
                tracing::debug!(id = saved.id, "record saved");
            }
        }
        self.initialize().await
    }

    /// Leave edit mode for the row at `position`.
    ///
    /// An unsaved row is discarded. A persisted row stays as it is; undoing
    /// its in-progress edits is the view's job.
    pub fn cancel_edit(&mut self, position: usize) -> Result<(), TableError> {
        let row = self.row(position)?;
        let id = row.id();
        if row.is_unsaved() {
            self.rows.remove(position);
        }
        self.editing = match self.editing {
            Some(p) if p == position => None,
            Some(p) if p > position && id.is_none() => Some(p - 1),
            other => other,
        };
        tracing::debug!(position, ?id, "editing cancelled");
        Ok(())
    }

    /// Soft-delete a record and refetch. The row stays visible until the
    /// refetch completes.
    pub async fn delete_record(&mut self, id: RecordId) -> Result<(), TableError> {
        self.api.delete(id).await?;
        tracing::debug!(id, "record deleted");
        self.initialize().await
    }

    fn row(&self, position: usize) -> Result<&Row, TableError> {
        self.rows.get(position).ok_or(TableError::NoSuchRow(position))
    }
}
