//! Spreadsheet rows and the common asset attributes carried on them.
//!
//! A [`Row`] maps column name to cell value. Cells are compared after trimming;
//! an empty cell is treated the same as a missing column.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One row of the spreadsheet, keyed by column header.
pub type Row = HashMap<String, String>;

pub const COL_DESCRIPTION: &str = "DESCRIPTION";
pub const COL_CERTIFICATE: &str = "CERTIFICATE";
pub const COL_CERT_MESSAGE: &str = "CERTIFICATE MESSAGE";
pub const COL_ANNOUNCEMENT: &str = "ANNOUNCEMENT";
pub const COL_ANNOUNCEMENT_TITLE: &str = "ANNOUNCEMENT TITLE";
pub const COL_ANNOUNCEMENT_MESSAGE: &str = "ANNOUNCEMENT MESSAGE";
pub const COL_OWNER_USERS: &str = "OWNER USERS";
pub const COL_OWNER_GROUPS: &str = "OWNER GROUPS";
pub const COL_CLASSIFICATIONS: &str = "CLASSIFICATIONS";

/// Non-empty, trimmed value of a column.
pub fn cell<'a>(row: &'a Row, column: &str) -> Option<&'a str> {
    row.get(column)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Columns from `required` that have no value on the row.
pub fn missing_fields(row: &Row, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|column| cell(row, column).is_none())
        .map(|column| column.to_string())
        .collect()
}

/// Columns from `required_empty` that unexpectedly carry a value on the row.
pub fn required_empty_fields(row: &Row, required_empty: &[&str]) -> Vec<String> {
    required_empty
        .iter()
        .filter(|column| cell(row, column).is_some())
        .map(|column| column.to_string())
        .collect()
}

/// Split a multi-valued cell on `delimiter`, dropping blanks and repeats.
pub fn split_multi(value: Option<&str>, delimiter: &str) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    let parts: Vec<&str> = if delimiter.is_empty() {
        vec![value]
    } else {
        value.split(delimiter).collect()
    };
    let mut values: Vec<String> = Vec::new();
    for part in parts.into_iter().map(str::trim).filter(|part| !part.is_empty()) {
        if !values.iter().any(|existing| existing == part) {
            values.push(part.to_string());
        }
    }
    values
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    Verified,
    Draft,
    Deprecated,
}

impl FromStr for CertificateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VERIFIED" => Ok(CertificateStatus::Verified),
            "DRAFT" => Ok(CertificateStatus::Draft),
            "DEPRECATED" => Ok(CertificateStatus::Deprecated),
            other => Err(format!("unknown certificate status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    Information,
    Warning,
    Issue,
}

impl FromStr for AnnouncementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "information" => Ok(AnnouncementType::Information),
            "warning" => Ok(AnnouncementType::Warning),
            "issue" => Ok(AnnouncementType::Issue),
            other => Err(format!("unknown announcement type: {other}")),
        }
    }
}

/// Attributes every asset row may carry, independent of the asset's own identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDetails {
    pub description: Option<String>,
    pub certificate: Option<CertificateStatus>,
    pub certificate_status_message: Option<String>,
    pub announcement_type: Option<AnnouncementType>,
    pub announcement_title: Option<String>,
    pub announcement_message: Option<String>,
    pub owner_users: Vec<String>,
    pub owner_groups: Vec<String>,
    /// Tag names, in sheet order, without duplicates.
    pub classifications: Vec<String>,
}

impl AssetDetails {
    /// Extract the common attributes from a row; multi-valued cells are split on `delimiter`.
    pub fn from_row(row: &Row, delimiter: &str) -> Self {
        AssetDetails {
            description: owned(cell(row, COL_DESCRIPTION)),
            certificate: parse_enum(row, COL_CERTIFICATE),
            certificate_status_message: owned(cell(row, COL_CERT_MESSAGE)),
            announcement_type: parse_enum(row, COL_ANNOUNCEMENT),
            announcement_title: owned(cell(row, COL_ANNOUNCEMENT_TITLE)),
            announcement_message: owned(cell(row, COL_ANNOUNCEMENT_MESSAGE)),
            owner_users: split_multi(cell(row, COL_OWNER_USERS), delimiter),
            owner_groups: split_multi(cell(row, COL_OWNER_GROUPS), delimiter),
            classifications: split_multi(cell(row, COL_CLASSIFICATIONS), delimiter),
        }
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn parse_enum<T: FromStr<Err = String>>(row: &Row, column: &str) -> Option<T> {
    let value = cell(row, column)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(column, value, error = %e, "Ignoring unrecognised value");
            None
        }
    }
}
