//! GSTR-1A sub-resource allow-list.
//!
//! The list is fixed at compile time and its order is the default
//! dispatch order for the aggregate endpoint.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the 24 GSTR-1A sections exposed by the GST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubResource {
    Retsum,
    Dociss,
    Cdnra,
    B2cl,
    B2ba,
    Ata,
    Txp,
    Supeco,
    Supecoa,
    Ecom,
    Ecoma,
    B2b,
    B2cla,
    B2csa,
    Cdnr,
    At,
    Expa,
    B2cs,
    Exp,
    Nil,
    Hsnsum,
    Cdnur,
    Cdnura,
    Txpa,
}

impl SubResource {
    /// The allow-list, in dispatch order.
    pub const ALL: [SubResource; 24] = [
        SubResource::Retsum,
        SubResource::Dociss,
        SubResource::Cdnra,
        SubResource::B2cl,
        SubResource::B2ba,
        SubResource::Ata,
        SubResource::Txp,
        SubResource::Supeco,
        SubResource::Supecoa,
        SubResource::Ecom,
        SubResource::Ecoma,
        SubResource::B2b,
        SubResource::B2cla,
        SubResource::B2csa,
        SubResource::Cdnr,
        SubResource::At,
        SubResource::Expa,
        SubResource::B2cs,
        SubResource::Exp,
        SubResource::Nil,
        SubResource::Hsnsum,
        SubResource::Cdnur,
        SubResource::Cdnura,
        SubResource::Txpa,
    ];

    /// Path segment used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            SubResource::Retsum => "retsum",
            SubResource::Dociss => "dociss",
            SubResource::Cdnra => "cdnra",
            SubResource::B2cl => "b2cl",
            SubResource::B2ba => "b2ba",
            SubResource::Ata => "ata",
            SubResource::Txp => "txp",
            SubResource::Supeco => "supeco",
            SubResource::Supecoa => "supecoa",
            SubResource::Ecom => "ecom",
            SubResource::Ecoma => "ecoma",
            SubResource::B2b => "b2b",
            SubResource::B2cla => "b2cla",
            SubResource::B2csa => "b2csa",
            SubResource::Cdnr => "cdnr",
            SubResource::At => "at",
            SubResource::Expa => "expa",
            SubResource::B2cs => "b2cs",
            SubResource::Exp => "exp",
            SubResource::Nil => "nil",
            SubResource::Hsnsum => "hsnsum",
            SubResource::Cdnur => "cdnur",
            SubResource::Cdnura => "cdnura",
            SubResource::Txpa => "txpa",
        }
    }
}

impl fmt::Display for SubResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match against the allow-list.
impl FromStr for SubResource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubResource::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or(())
    }
}

/// Caller asked for sections outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid endpoints provided: {}. Valid endpoints are: {}",
    .offending.join(", "),
    allowed_names().join(", ")
)]
pub struct InvalidEndpoints {
    pub offending: Vec<String>,
}

impl InvalidEndpoints {
    pub fn allowed(&self) -> Vec<&'static str> {
        allowed_names()
    }
}

fn allowed_names() -> Vec<&'static str> {
    SubResource::ALL.iter().map(|r| r.as_str()).collect()
}

/// Resolve a comma-separated selection into sections to dispatch.
///
/// Absent or blank input selects the whole allow-list. Repeated names are
/// kept once, at their first position.
pub fn validate(endpoints: Option<&str>) -> Result<Vec<SubResource>, InvalidEndpoints> {
    let requested: Vec<&str> = endpoints
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    if requested.is_empty() {
        return Ok(SubResource::ALL.to_vec());
    }

    let mut selected = Vec::with_capacity(requested.len());
    let mut offending: Vec<String> = Vec::new();

    for name in requested {
        match name.parse::<SubResource>() {
            Ok(resource) => {
                if !selected.contains(&resource) {
                    selected.push(resource);
                }
            }
            Err(()) => {
                if !offending.iter().any(|o| o == name) {
                    offending.push(name.to_string());
                }
            }
        }
    }

    if !offending.is_empty() {
        return Err(InvalidEndpoints { offending });
    }
    Ok(selected)
}
