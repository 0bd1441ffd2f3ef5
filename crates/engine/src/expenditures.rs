//! Expenditures: money going out, tagged with an expenditure label.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{
    Clock, EngineError, Label,
    ids::{IdKind, new_id},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expenditure {
    id: String,
    payment_name: String,
    amount: Decimal,
    payment_date_on_utc: NaiveDate,
    label_id: String,
    created_on_utc: DateTime<Utc>,
    updated_on_utc: Option<DateTime<Utc>>,
}

impl Expenditure {
    pub fn create(
        payment_name: impl Into<String>,
        amount: Decimal,
        payment_date_on_utc: NaiveDate,
        label: &Label,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id: new_id(IdKind::Expenditure, now),
            payment_name: payment_name.into(),
            amount,
            payment_date_on_utc,
            label_id: label.id().to_string(),
            created_on_utc: now,
            updated_on_utc: None,
        }
    }

    pub fn update(
        &mut self,
        payment_name: impl Into<String>,
        amount: Decimal,
        payment_date_on_utc: NaiveDate,
        label: &Label,
        clock: &dyn Clock,
    ) {
        self.payment_name = payment_name.into();
        self.amount = amount;
        self.payment_date_on_utc = payment_date_on_utc;
        self.label_id = label.id().to_string();
        self.updated_on_utc = Some(clock.now());
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn payment_name(&self) -> &str {
        &self.payment_name
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn payment_date_on_utc(&self) -> NaiveDate {
        self.payment_date_on_utc
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
#[sea_orm(table_name = "expenditures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub payment_name: String,
    pub amount: String,
    pub payment_date_on_utc: Date,
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

impl From<&Expenditure> for ActiveModel {
    fn from(expenditure: &Expenditure) -> Self {
        Self {
            id: ActiveValue::Set(expenditure.id.clone()),
            payment_name: ActiveValue::Set(expenditure.payment_name.clone()),
            amount: ActiveValue::Set(expenditure.amount.to_string()),
            payment_date_on_utc: ActiveValue::Set(expenditure.payment_date_on_utc),
            label_id: ActiveValue::Set(expenditure.label_id.clone()),
            created_on_utc: ActiveValue::Set(expenditure.created_on_utc),
            updated_on_utc: ActiveValue::Set(expenditure.updated_on_utc),
        }
    }
}

impl TryFrom<Model> for Expenditure {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(&model.amount).map_err(|_| {
            EngineError::CorruptRecord(format!(
                "expenditure '{}' has invalid amount '{}'",
                model.id, model.amount
            ))
        })?;
        Ok(Self {
            id: model.id,
            payment_name: model.payment_name,
            amount,
            payment_date_on_utc: model.payment_date_on_utc,
            label_id: model.label_id,
            created_on_utc: model.created_on_utc,
            updated_on_utc: model.updated_on_utc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedClock;
    use chrono::TimeZone;

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap())
    }

    fn groceries() -> Label {
        Label::create("Groceries", false, &clock())
    }

    #[test]
    fn create_links_label_and_prefixes_id() {
        let label = groceries();
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let expenditure = Expenditure::create("Milk", Decimal::new(350, 2), date, &label, &clock());

        assert!(expenditure.id().starts_with("e_"));
        assert_eq!(expenditure.label_id(), label.id());
        assert_eq!(expenditure.amount(), Decimal::new(35, 1));
        assert_eq!(expenditure.updated_on_utc(), None);
    }

    #[test]
    fn stored_amount_keeps_exact_scale() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let expenditure =
            Expenditure::create("Milk", Decimal::new(350, 2), date, &groceries(), &clock());

        let active = ActiveModel::from(&expenditure);
        assert_eq!(active.amount.unwrap(), "3.50");
    }

    #[test]
    fn unparsable_amount_is_a_corrupt_record() {
        let model = Model {
            id: "e_1".to_string(),
            payment_name: "Milk".to_string(),
            amount: "three".to_string(),
            payment_date_on_utc: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            label_id: "l_1".to_string(),
            created_on_utc: clock().now(),
            updated_on_utc: None,
        };

        assert!(matches!(
            Expenditure::try_from(model),
            Err(EngineError::CorruptRecord(_))
        ));
    }
}
