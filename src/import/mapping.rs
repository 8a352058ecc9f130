use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::import::tokenizer::RawRow;

/// The fixed target schema a source column can be mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetField {
    Symbol,
    Date,
    Time,
    Type,
    Entry,
    Exit,
    Size,
    Tp,
    Sl,
    MarketType,
    Commission,
    TickValue,
    PipValue,
    Notes,
}

impl TargetField {
    pub const ALL: [TargetField; 14] = [
        TargetField::Symbol,
        TargetField::Date,
        TargetField::Time,
        TargetField::Type,
        TargetField::Entry,
        TargetField::Exit,
        TargetField::Size,
        TargetField::Tp,
        TargetField::Sl,
        TargetField::MarketType,
        TargetField::Commission,
        TargetField::TickValue,
        TargetField::PipValue,
        TargetField::Notes,
    ];

    /// Fields that must be mapped before the transform step unlocks.
    pub const REQUIRED: [TargetField; 6] = [
        TargetField::Symbol,
        TargetField::Date,
        TargetField::Type,
        TargetField::Entry,
        TargetField::Exit,
        TargetField::Size,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TargetField::Symbol => "symbol",
            TargetField::Date => "date",
            TargetField::Time => "time",
            TargetField::Type => "type",
            TargetField::Entry => "entry",
            TargetField::Exit => "exit",
            TargetField::Size => "size",
            TargetField::Tp => "tp",
            TargetField::Sl => "sl",
            TargetField::MarketType => "marketType",
            TargetField::Commission => "commission",
            TargetField::TickValue => "tickValue",
            TargetField::PipValue => "pipValue",
            TargetField::Notes => "notes",
        }
    }

    pub fn from_key(key: &str) -> Option<TargetField> {
        TargetField::ALL
            .iter()
            .copied()
            .find(|f| f.key().eq_ignore_ascii_case(key))
    }
}

/// User-supplied assignment of source columns to target fields. Mutable
/// during the mapping step, frozen once the transform pass runs.
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    columns: HashMap<TargetField, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        ColumnMapping::default()
    }

    pub fn set(&mut self, field: TargetField, column: impl Into<String>) {
        self.columns.insert(field, column.into());
    }

    pub fn clear(&mut self, field: TargetField) {
        self.columns.remove(&field);
    }

    pub fn source(&self, field: TargetField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn is_mapped(&self, field: TargetField) -> bool {
        self.columns.contains_key(&field)
    }

    /// Raw value for a target field out of one row. `None` when the field
    /// is unmapped; an empty string when the mapped column is absent.
    pub fn value<'a>(&self, field: TargetField, row: &'a RawRow) -> Option<&'a str> {
        let column = self.columns.get(&field)?;
        Some(row.get(column).map(String::as_str).unwrap_or(""))
    }

    pub fn missing_required(&self) -> Vec<TargetField> {
        TargetField::REQUIRED
            .iter()
            .copied()
            .filter(|f| !self.is_mapped(*f))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }
}
