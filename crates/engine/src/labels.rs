//! Labels: the income and expenditure categories records point at.
//!
//! A label is never removed from storage. Deleting one only flips
//! `is_deleted`, so expenditures and incomes that already reference it keep
//! resolving, while new writes refuse it.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{
    Clock,
    ids::{IdKind, new_id},
};

/// Which kind of record a label may be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelKind {
    Income,
    Expenditure,
}

impl LabelKind {
    pub fn is_income(self) -> bool {
        matches!(self, Self::Income)
    }
}

impl From<bool> for LabelKind {
    fn from(is_income: bool) -> Self {
        if is_income {
            Self::Income
        } else {
            Self::Expenditure
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    id: String,
    name: String,
    is_income: bool,
    is_deleted: bool,
    created_on_utc: DateTime<Utc>,
    updated_on_utc: Option<DateTime<Utc>>,
}

impl Label {
    pub fn create(name: impl Into<String>, is_income: bool, clock: &dyn Clock) -> Self {
        let now = clock.now();
        Self {
            id: new_id(IdKind::Label, now),
            name: name.into(),
            is_income,
            is_deleted: false,
            created_on_utc: now,
            updated_on_utc: None,
        }
    }

    pub fn update(&mut self, name: impl Into<String>, is_income: bool, clock: &dyn Clock) {
        self.name = name.into();
        self.is_income = is_income;
        self.updated_on_utc = Some(clock.now());
    }

    /// Soft-delete: the row stays, new records can no longer use it.
    pub fn mark_deleted(&mut self, clock: &dyn Clock) {
        self.is_deleted = true;
        self.updated_on_utc = Some(clock.now());
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_income(&self) -> bool {
        self.is_income
    }

    pub fn kind(&self) -> LabelKind {
        LabelKind::from(self.is_income)
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn created_on_utc(&self) -> DateTime<Utc> {
        self.created_on_utc
    }

    pub fn updated_on_utc(&self) -> Option<DateTime<Utc>> {
        self.updated_on_utc
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "labels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub is_income: bool,
    pub is_deleted: bool,
    pub created_on_utc: DateTimeUtc,
    pub updated_on_utc: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Label> for ActiveModel {
    fn from(label: &Label) -> Self {
        Self {
            id: ActiveValue::Set(label.id.clone()),
            name: ActiveValue::Set(label.name.clone()),
            is_income: ActiveValue::Set(label.is_income),
            is_deleted: ActiveValue::Set(label.is_deleted),
            created_on_utc: ActiveValue::Set(label.created_on_utc),
            updated_on_utc: ActiveValue::Set(label.updated_on_utc),
        }
    }
}

impl From<Model> for Label {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_income: model.is_income,
            is_deleted: model.is_deleted,
            created_on_utc: model.created_on_utc,
            updated_on_utc: model.updated_on_utc,
        }
    }
}
