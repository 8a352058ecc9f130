use crate::error::ImportError;
use crate::import::mapping::{ColumnMapping, TargetField};
use crate::import::pnl::ImportDefaults;
use crate::import::tokenizer::{self, CsvDocument};
use crate::import::validate::{self, RowError};
use crate::models::Trade;

/// Upload size cap for CSV payloads.
pub const MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStep {
    Upload,
    Map,
    Validate,
    Confirm,
    /// Terminal state after a successful commit.
    Complete,
}

impl ImportStep {
    pub fn name(self) -> &'static str {
        match self {
            ImportStep::Upload => "upload",
            ImportStep::Map => "map",
            ImportStep::Validate => "validate",
            ImportStep::Confirm => "confirm",
            ImportStep::Complete => "complete",
        }
    }
}

/// One user-initiated import, progressing upload -> map -> validate ->
/// confirm. Strictly forward except for explicit `back` transitions; no
/// side effects until the commit step. Created fresh per import and
/// discarded after success.
#[derive(Debug, Default)]
pub struct ImportSession {
    step: Option<ImportStep>,
    document: Option<CsvDocument>,
    mapping: ColumnMapping,
    defaults: ImportDefaults,
    selected_accounts: Vec<String>,
    valid: Vec<Trade>,
    invalid: Vec<RowError>,
}

impl ImportSession {
    pub fn new() -> Self {
        ImportSession {
            step: Some(ImportStep::Upload),
            ..ImportSession::default()
        }
    }

    pub fn step(&self) -> ImportStep {
        self.step.unwrap_or(ImportStep::Upload)
    }

    pub(crate) fn expect_step(&self, expected: ImportStep) -> Result<(), ImportError> {
        let actual = self.step();
        if actual == expected {
            Ok(())
        } else {
            Err(ImportError::InvalidStep {
                expected: expected.name(),
                actual: actual.name(),
            })
        }
    }

    /// Accept CSV text from a file upload or pasted content and move to the
    /// mapping step.
    pub fn upload(&mut self, text: &str) -> Result<(), ImportError> {
        self.expect_step(ImportStep::Upload)?;

        if text.len() > MAX_IMPORT_BYTES {
            return Err(ImportError::MalformedInput(
                "import exceeds the 5 MB limit".to_string(),
            ));
        }

        let document = tokenizer::tokenize(text)?;
        if document.rows.is_empty() {
            return Err(ImportError::MalformedInput(
                "no data rows found".to_string(),
            ));
        }

        log::info!(
            "Parsed import: {} columns, {} rows",
            document.headers.len(),
            document.rows.len()
        );
        self.document = Some(document);
        self.step = Some(ImportStep::Map);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        self.document
            .as_ref()
            .map(|d| d.headers.as_slice())
            .unwrap_or(&[])
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn defaults(&self) -> ImportDefaults {
        self.defaults
    }

    pub fn map_column(&mut self, field: TargetField, column: &str) -> Result<(), ImportError> {
        self.expect_step(ImportStep::Map)?;
        if !self.headers().iter().any(|h| h == column) {
            return Err(ImportError::UnknownColumn(column.to_string()));
        }
        self.mapping.set(field, column);
        Ok(())
    }

    pub fn unmap_column(&mut self, field: TargetField) -> Result<(), ImportError> {
        self.expect_step(ImportStep::Map)?;
        self.mapping.clear(field);
        Ok(())
    }

    pub fn set_defaults(&mut self, defaults: ImportDefaults) -> Result<(), ImportError> {
        self.expect_step(ImportStep::Map)?;
        self.defaults = defaults;
        Ok(())
    }

    pub fn missing_required(&self) -> Vec<TargetField> {
        self.mapping.missing_required()
    }

    /// Whether the process action is unlocked, i.e. all six required
    /// fields are mapped.
    pub fn can_process(&self) -> bool {
        self.step() == ImportStep::Map && self.mapping.is_complete()
    }

    /// Freeze the mapping, run the transform pass and partition the rows.
    pub fn process(&mut self) -> Result<(), ImportError> {
        self.expect_step(ImportStep::Map)?;

        let missing = self.mapping.missing_required();
        if !missing.is_empty() {
            return Err(ImportError::MissingRequiredMapping(missing));
        }

        let document = self
            .document
            .as_ref()
            .ok_or_else(|| ImportError::MalformedInput("no document uploaded".to_string()))?;

        let candidates =
            crate::import::transform::build_candidates(document, &self.mapping, &self.defaults);
        let outcome = validate::validate_all(candidates);

        log::info!(
            "Processed import: {} valid, {} rejected",
            outcome.valid.len(),
            outcome.invalid.len()
        );
        self.valid = outcome.valid;
        self.invalid = outcome.invalid;
        self.step = Some(ImportStep::Validate);
        Ok(())
    }

    pub fn valid_trades(&self) -> &[Trade] {
        &self.valid
    }

    pub fn row_errors(&self) -> &[RowError] {
        &self.invalid
    }

    pub fn proceed_to_confirm(&mut self) -> Result<(), ImportError> {
        self.expect_step(ImportStep::Validate)?;
        if self.valid.is_empty() {
            return Err(ImportError::NothingToImport);
        }
        self.step = Some(ImportStep::Confirm);
        Ok(())
    }

    pub fn select_accounts(&mut self, account_ids: Vec<String>) -> Result<(), ImportError> {
        self.expect_step(ImportStep::Confirm)?;
        self.selected_accounts = account_ids;
        Ok(())
    }

    pub fn selected_accounts(&self) -> &[String] {
        &self.selected_accounts
    }

    /// Explicit user-triggered backwards transition. Derived state from the
    /// abandoned step is discarded.
    pub fn back(&mut self) -> Result<(), ImportError> {
        match self.step() {
            ImportStep::Map => {
                self.document = None;
                self.mapping = ColumnMapping::new();
                self.step = Some(ImportStep::Upload);
            }
            ImportStep::Validate => {
                self.valid.clear();
                self.invalid.clear();
                self.step = Some(ImportStep::Map);
            }
            ImportStep::Confirm => {
                self.selected_accounts.clear();
                self.step = Some(ImportStep::Validate);
            }
            step => {
                return Err(ImportError::InvalidStep {
                    expected: "map, validate or confirm",
                    actual: step.name(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn mark_complete(&mut self) {
        self.step = Some(ImportStep::Complete);
    }
}
