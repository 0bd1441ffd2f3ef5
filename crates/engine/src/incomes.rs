//! Incomes: money coming in, tagged with an income label.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{
    Clock, EngineError, Label,
    ids::{IdKind, new_id},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Income {
    id: String,
    income_name: String,
    amount: Decimal,
    income_date_on_utc: NaiveDate,
    label_id: String,
    created_on_utc: DateTime<Utc>,
    updated_on_utc: Option<DateTime<Utc>>,
}

impl Income {
    pub fn create(
        income_name: impl Into<String>,
        amount: Decimal,
        income_date_on_utc: NaiveDate,
        label: &Label,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id: new_id(IdKind::Income, now),
            income_name: income_name.into(),
            amount,
            income_date_on_utc,
            label_id: label.id().to_string(),
            created_on_utc: now,
            updated_on_utc: None,
        }
    }

    pub fn update(
        &mut self,
        income_name: impl Into<String>,
        amount: Decimal,
        income_date_on_utc: NaiveDate,
        label: &Label,
        clock: &dyn Clock,
    ) {
        self.income_name = income_name.into();
        self.amount = amount;
        self.income_date_on_utc = income_date_on_utc;
        self.label_id = label.id().to_string();
        self.updated_on_utc = Some(clock.now());
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn income_name(&self) -> &str {
        &self.income_name
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn income_date_on_utc(&self) -> NaiveDate {
        self.income_date_on_utc
    }

    pub fn label_id(&self) -> &str {
        &self.label_id
    }

    pub fn created_on_utc(&self) -> DateTime<Utc> {
        self.created_on_utc
    }

    pub fn updated_on_utc(&self) -> Option<DateTime<Utc>> {
        self.updated_on_utc
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub income_name: String,
    pub amount: String,
    pub income_date_on_utc: Date,
    pub label_id: String,
    pub created_on_utc: DateTimeUtc,
    pub updated_on_utc: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::labels::Entity",
        from = "Column::LabelId",
        to = "super::labels::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Label,
}

impl Related<super::labels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Label.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Income> for ActiveModel {
    fn from(income: &Income) -> Self {
        Self {
            id: ActiveValue::Set(income.id.clone()),
            income_name: ActiveValue::Set(income.income_name.clone()),
            amount: ActiveValue::Set(income.amount.to_string()),
            income_date_on_utc: ActiveValue::Set(income.income_date_on_utc),
            label_id: ActiveValue::Set(income.label_id.clone()),
            created_on_utc: ActiveValue::Set(income.created_on_utc),
            updated_on_utc: ActiveValue::Set(income.updated_on_utc),
        }
    }
}

impl TryFrom<Model> for Income {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(&model.amount).map_err(|_| {
            EngineError::CorruptRecord(format!(
                "income '{}' has invalid amount '{}'",
                model.id, model.amount
            ))
        })?;
        Ok(Self {
            id: model.id,
            income_name: model.income_name,
            amount,
            income_date_on_utc: model.income_date_on_utc,
            label_id: model.label_id,
            created_on_utc: model.created_on_utc,
            updated_on_utc: model.updated_on_utc,
        })
    }
}
