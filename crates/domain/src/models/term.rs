//! Academic terms shown in the schedule views.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::patch::Patch;
use super::status::ContentStatus;
use shared::datetime::{format_naive_date, parse_date};

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub id: i64,
    pub term: String,
    pub start_date: NaiveDate,
    pub status: ContentStatus,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTerm {
    pub id: i64,
    pub term: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct TermChanges {
    pub term: Patch<String>,
    pub start_date: Patch<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTermRequest {
    pub term: String,
    pub start_date: String,
}

impl AddTermRequest {
    /// `None` when the start date is not `YYYY-MM-DD`.
    pub fn parse(self) -> Option<(String, NaiveDate)> {
        let start = parse_date(&self.start_date)?;
        Some((self.term, start))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyTermRequest {
    pub id: i64,
    #[serde(default)]
    pub term: Patch<String>,
    #[serde(default)]
    pub start_date: Patch<String>,
}

impl ModifyTermRequest {
    /// `None` when a given start date does not parse.
    pub fn into_changes(self) -> Option<(i64, TermChanges)> {
        let start_date = match self.start_date {
            Patch::Set(raw) => Patch::Set(parse_date(&raw)?),
            Patch::Unchanged => Patch::Unchanged,
        };
        Some((
            self.id,
            TermChanges {
                term: self.term,
                start_date,
            },
        ))
    }
}

/// `deleteTerm` takes the id as a form field or query parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteTermForm {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermItem {
    pub id: i64,
    pub term: String,
    pub start_date: String,
}

impl TermItem {
    pub fn new(term: &Term, start_date: String) -> Self {
        Self {
            id: term.id,
            term: term.term.clone(),
            start_date,
        }
    }
}

impl From<Term> for TermItem {
    fn from(term: Term) -> Self {
        let start_date = format_naive_date(term.start_date);
        Self::new(&term, start_date)
    }
}
