//! JSON bodies exchanged with the HTTP API.
//!
//! Field names are camelCase on the wire. Request bodies default every
//! missing field (empty text, zero amount, `0001-01-01`) so an incomplete
//! body reaches the engine and is answered with a validation failure instead
//! of a decoding error.
//!
//! Amounts are JSON numbers read and written digit for digit, never through
//! a float.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date used for a missing date field. Never passes validation.
pub fn unset_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub mod common {
    use super::*;

    /// Query string of listing endpoints: `?page=1&pageSize=10`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageQuery {
        pub page: Option<i64>,
        pub page_size: Option<i64>,
    }

    /// One window of a listing.
    ///
    /// `totalCount` counts the items of this window only.
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Page<T> {
        pub items: Vec<T>,
        pub page: i64,
        pub page_size: i64,
        pub total_count: i64,
    }

    /// Body of every 400 response.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub code: String,
        pub message: String,
    }

    /// Body of a 500 response. Never carries internal details.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Problem {
        pub title: String,
        pub detail: String,
    }

    /// Label summary embedded in expenditure and income responses.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LabelRef {
        pub id: String,
        pub name: String,
    }
}

pub mod label {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct LabelNew {
        pub name: String,
        pub is_income: bool,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct LabelUpdate {
        pub name: String,
        pub is_income: bool,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LabelView {
        pub id: String,
        pub name: String,
        pub is_income: bool,
        pub is_deleted: bool,
    }
}

pub mod expenditure {
    use super::{common::LabelRef, *};

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenditureNew {
        #[serde(default)]
        pub payment_name: String,
        #[serde(default, with = "rust_decimal::serde::arbitrary_precision")]
        pub amount: Decimal,
        /// Older clients send `paymentDateOnLocal`.
        #[serde(default = "unset_date", alias = "paymentDateOnLocal")]
        pub payment_date_on_utc: NaiveDate,
        #[serde(default)]
        pub label_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenditureUpdate {
        #[serde(default)]
        pub payment_name: String,
        #[serde(default, with = "rust_decimal::serde::arbitrary_precision")]
        pub amount: Decimal,
        #[serde(default = "unset_date")]
        pub payment_date_on_utc: NaiveDate,
        #[serde(default)]
        pub label_id: String,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenditureView {
        pub id: String,
        pub payment_name: String,
        #[serde(with = "rust_decimal::serde::arbitrary_precision")]
        pub amount: Decimal,
        pub payment_date_on_utc: NaiveDate,
        pub label: LabelRef,
    }
}

pub mod income {
    use super::{common::LabelRef, *};

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeNew {
        #[serde(default)]
        pub income_name: String,
        #[serde(default, with = "rust_decimal::serde::arbitrary_precision")]
        pub amount: Decimal,
        #[serde(default = "unset_date")]
        pub income_date_on_utc: NaiveDate,
        #[serde(default)]
        pub label_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeUpdate {
        #[serde(default)]
        pub income_name: String,
        #[serde(default, with = "rust_decimal::serde::arbitrary_precision")]
        pub amount: Decimal,
        #[serde(default = "unset_date")]
        pub income_date_on_utc: NaiveDate,
        #[serde(default)]
        pub label_id: String,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeView {
        pub id: String,
        pub income_name: String,
        #[serde(with = "rust_decimal::serde::arbitrary_precision")]
        pub amount: Decimal,
        pub income_date_on_utc: NaiveDate,
        pub label: LabelRef,
    }
}
