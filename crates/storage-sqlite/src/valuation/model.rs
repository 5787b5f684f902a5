//! Database model for the aggregate daily valuation rows.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::utils::parse_decimal;
use perfolio_core::errors::{Error, Result};
use perfolio_core::performance::ValuationPoint;

#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::daily_account_valuation)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyValuationDB {
    pub id: String,
    pub account_id: String,
    pub valuation_date: NaiveDate,
    pub total_value: String,
    pub calculated_at: String,
}

impl DailyValuationDB {
    pub fn from_point(account_id: &str, point: &ValuationPoint, calculated_at: &str) -> Self {
        Self {
            id: format!("{}_{}", account_id, point.date.format("%Y-%m-%d")),
            account_id: account_id.to_string(),
            valuation_date: point.date,
            total_value: point.total_value.to_string(),
            calculated_at: calculated_at.to_string(),
        }
    }
}

impl TryFrom<DailyValuationDB> for ValuationPoint {
    type Error = Error;

    fn try_from(db: DailyValuationDB) -> Result<Self> {
        Ok(ValuationPoint {
            date: db.valuation_date,
            total_value: parse_decimal("daily_account_valuation.total_value", &db.total_value)?,
        })
    }
}
