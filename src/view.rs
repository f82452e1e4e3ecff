//! Viewer state machine.
//!
//! The controller owns the parsed workbook and an explicit, serializable
//! [`ViewState`]. Phases move `NoFile -> FileLoaded -> SheetSelected`, and a
//! new file can be loaded from any phase. File reads are asynchronous in the
//! browser, so each read is tagged with a [`ReadTicket`]; completing a read
//! whose ticket has been superseded leaves the state untouched.

use serde::{Deserialize, Serialize};

use crate::error::{Result, XlgridError};
use crate::grid::{load_sheet, LayoutDescriptor, Row};
use crate::parser;
use crate::types::Workbook;

/// Where the viewer is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewPhase {
    #[default]
    NoFile,
    /// Workbook parsed, no sheet selected (the workbook has no sheets)
    FileLoaded,
    SheetSelected,
}

/// Everything the renderer needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub phase: ViewPhase,
    pub sheet_names: Vec<String>,
    pub selected_sheet: Option<String>,
    pub headers: Row,
    pub rows: Vec<Row>,
}

impl ViewState {
    pub fn has_workbook(&self) -> bool {
        self.phase != ViewPhase::NoFile
    }

    /// A sheet is selected but produced neither headers nor rows.
    pub fn is_empty_selection(&self) -> bool {
        self.has_workbook()
            && self.selected_sheet.is_some()
            && self.headers.is_empty()
            && self.rows.is_empty()
    }
}

/// Identifies one file read; only the most recently issued ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTicket(u64);

/// Result of completing a file read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Applied,
    /// A newer read was started; the bytes were discarded
    Stale,
}

#[derive(Debug, Default)]
pub struct ViewController {
    workbook: Option<Workbook>,
    state: ViewState,
    layout: LayoutDescriptor,
    generation: u64,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: LayoutDescriptor) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }

    pub fn workbook(&self) -> Option<&Workbook> {
        self.workbook.as_ref()
    }

    /// Change the layout and re-derive the selected sheet with it.
    pub fn set_layout(&mut self, layout: LayoutDescriptor) {
        self.layout = layout;
        if let Some(name) = self.state.selected_sheet.clone() {
            self.apply_selection(&name);
        }
    }

    /// Start a file read. Any ticket issued before this one becomes stale.
    pub fn begin_file_read(&mut self) -> ReadTicket {
        self.generation = self.generation.wrapping_add(1);
        ReadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: ReadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Finish a file read started with [`begin_file_read`](Self::begin_file_read).
    ///
    /// # Errors
    /// Returns the parse error for unreadable bytes. The previous state is
    /// kept so another file can be loaded.
    pub fn complete_file_read(&mut self, ticket: ReadTicket, bytes: &[u8]) -> Result<ReadOutcome> {
        if !self.is_current(ticket) {
            log::debug!(
                "Discarding file read {} (current is {})",
                ticket.0,
                self.generation
            );
            return Ok(ReadOutcome::Stale);
        }

        let workbook = parser::parse(bytes)?;
        self.load_workbook(workbook);
        Ok(ReadOutcome::Applied)
    }

    /// Replace the workbook and select its first sheet.
    pub fn load_workbook(&mut self, workbook: Workbook) {
        let sheet_names = workbook.sheet_names();
        let first = sheet_names.first().cloned();
        self.workbook = Some(workbook);
        self.state = ViewState {
            phase: ViewPhase::FileLoaded,
            sheet_names,
            ..ViewState::default()
        };

        match first {
            Some(name) => self.apply_selection(&name),
            None => log::warn!("Workbook contains no sheets."),
        }
    }

    /// Select a sheet by name and recompute headers and rows.
    ///
    /// # Errors
    /// Fails when no workbook has been loaded yet.
    pub fn select_sheet(&mut self, name: &str) -> Result<()> {
        if self.workbook.is_none() {
            return Err(XlgridError::Other(format!(
                "cannot select sheet \"{name}\" before a workbook is loaded"
            )));
        }
        self.apply_selection(name);
        Ok(())
    }

    fn apply_selection(&mut self, name: &str) {
        let Some(workbook) = self.workbook.as_ref() else {
            return;
        };
        let data = load_sheet(workbook, name, &self.layout);
        self.state.selected_sheet = Some(name.to_string());
        self.state.headers = data.headers;
        self.state.rows = data.rows;
        self.state.phase = ViewPhase::SheetSelected;
    }
}
