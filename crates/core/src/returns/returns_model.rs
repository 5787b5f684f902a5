use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One dated value of a valuation or price history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

impl ValuePoint {
    pub fn new(date: NaiveDate, value: Decimal) -> Self {
        Self { date, value }
    }
}

/// Daily percentage return (`1.5` = 1.5%) and the value it ended at.
///
/// The return covers `previous_date..=date`: `previous_date` is the date of
/// the value it is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnObservation {
    pub date: NaiveDate,
    pub previous_date: NaiveDate,
    pub return_pct: Decimal,
    pub value: Decimal,
}

/// Two return series joined on their common dates.
///
/// `a[i]` and `b[i]` always share the same date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedReturns {
    pub a: Vec<ReturnObservation>,
    pub b: Vec<ReturnObservation>,
}

impl AlignedReturns {
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.a.first().map(|o| o.date)
    }

    /// Date of the value the first aligned return is measured from, i.e. the
    /// start of the window the aligned returns cover.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.a.first().map(|o| o.previous_date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.a.last().map(|o| o.date)
    }
}
