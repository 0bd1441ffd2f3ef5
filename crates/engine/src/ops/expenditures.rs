use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseTransaction, QueryOrder, QuerySelect, prelude::*};

use crate::{
    EngineError, Expenditure, Failure, Label, LabelKind, Outcome, Page, PageRequest, ResultEngine,
    dispatch::{Context, Handler, Registry, Request},
    expenditures, labels,
    validation::{Rules, Validate},
};

use super::{
    labels::{find_usable_label, label_not_found},
    with_tx,
};

const MAX_PAYMENT_NAME: usize = 100;
const MAX_LABEL_ID: usize = 100;

pub(super) fn register(registry: &mut Registry) -> ResultEngine<()> {
    registry.register::<CreateExpenditure, _>(Expenditures)?;
    registry.register::<GetExpenditure, _>(Expenditures)?;
    registry.register::<GetExpenditures, _>(Expenditures)?;
    registry.register::<UpdateExpenditure, _>(Expenditures)?;
    registry.register::<DeleteExpenditure, _>(Expenditures)
}

/// An expenditure together with the label it points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenditureDetail {
    pub expenditure: Expenditure,
    pub label: Label,
}

/// Record an expenditure. Succeeds with the new expenditure id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateExpenditure {
    pub payment_name: String,
    pub amount: Decimal,
    pub payment_date_on_utc: NaiveDate,
    pub label_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetExpenditure {
    pub id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetExpenditures {
    pub page: PageRequest,
}

/// Replace every field of an existing expenditure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateExpenditure {
    pub id: String,
    pub payment_name: String,
    pub amount: Decimal,
    pub payment_date_on_utc: NaiveDate,
    pub label_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteExpenditure {
    pub id: String,
}

fn validate_fields(
    rules: &mut Rules,
    payment_name: &str,
    amount: Decimal,
    payment_date_on_utc: NaiveDate,
    label_id: &str,
) {
    rules
        .required_text("Payment Name", payment_name, MAX_PAYMENT_NAME)
        .positive_amount("Amount", amount)
        .after_min_date("Payment Date", payment_date_on_utc)
        .required_text("Label Id", label_id, MAX_LABEL_ID);
}

impl Validate for CreateExpenditure {
    fn validate(&self, rules: &mut Rules) {
        validate_fields(
            rules,
            &self.payment_name,
            self.amount,
            self.payment_date_on_utc,
            &self.label_id,
        );
    }
}

impl Validate for GetExpenditure {
    fn validate(&self, rules: &mut Rules) {
        rules.not_empty("Id", &self.id);
    }
}

impl Validate for GetExpenditures {
    fn validate(&self, rules: &mut Rules) {
        self.page.validate(rules);
    }
}

impl Validate for UpdateExpenditure {
    fn validate(&self, rules: &mut Rules) {
        rules.not_empty("Id", &self.id);
        validate_fields(
            rules,
            &self.payment_name,
            self.amount,
            self.payment_date_on_utc,
            &self.label_id,
        );
    }
}

impl Validate for DeleteExpenditure {
    fn validate(&self, rules: &mut Rules) {
        rules.not_empty("Id", &self.id);
    }
}

impl Request for CreateExpenditure {
    type Response = String;
    const OPERATION: &'static str = "CreateExpenditure";
}

impl Request for GetExpenditure {
    type Response = ExpenditureDetail;
    const OPERATION: &'static str = "GetExpenditure";
}

impl Request for GetExpenditures {
    type Response = Page<ExpenditureDetail>;
    const OPERATION: &'static str = "GetExpenditures";
}

impl Request for UpdateExpenditure {
    type Response = ();
    const OPERATION: &'static str = "UpdateExpenditure";
}

impl Request for DeleteExpenditure {
    type Response = ();
    const OPERATION: &'static str = "DeleteExpenditure";
}

fn expenditure_not_found<T>(operation: &str, id: &str) -> Outcome<T> {
    Outcome::failure(Failure::not_found(operation, "Expenditure", id))
}

fn into_detail(
    (model, label): (expenditures::Model, Option<labels::Model>),
) -> ResultEngine<ExpenditureDetail> {
    let label = label.ok_or_else(|| {
        EngineError::CorruptRecord(format!(
            "expenditure '{}' points at missing label '{}'",
            model.id, model.label_id
        ))
    })?;
    Ok(ExpenditureDetail {
        expenditure: Expenditure::try_from(model)?,
        label: Label::from(label),
    })
}

async fn find_expenditure(
    ctx: &Context<'_>,
    db_tx: &DatabaseTransaction,
    id: &str,
) -> ResultEngine<Option<Expenditure>> {
    let model = ctx
        .guard(expenditures::Entity::find_by_id(id.to_string()).one(db_tx))
        .await?;
    model.map(Expenditure::try_from).transpose()
}

/// Handles every expenditure request.
struct Expenditures;

#[async_trait]
impl Handler<CreateExpenditure> for Expenditures {
    async fn handle(
        &self,
        request: CreateExpenditure,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<String>> {
        with_tx!(ctx, |db_tx| {
            let Some(label) =
                find_usable_label(ctx, &db_tx, &request.label_id, LabelKind::Expenditure).await?
            else {
                return Ok(label_not_found(
                    CreateExpenditure::OPERATION,
                    &request.label_id,
                ));
            };
            let expenditure = Expenditure::create(
                request.payment_name,
                request.amount,
                request.payment_date_on_utc,
                &label,
                ctx.clock(),
            );
            ctx.guard(expenditures::ActiveModel::from(&expenditure).insert(&db_tx))
                .await?;
            tracing::info!(
                expenditure_id = expenditure.id(),
                label_id = label.id(),
                "expenditure created"
            );
            Outcome::success(expenditure.id().to_string())
        })
    }
}

#[async_trait]
impl Handler<GetExpenditure> for Expenditures {
    async fn handle(
        &self,
        request: GetExpenditure,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<ExpenditureDetail>> {
        with_tx!(ctx, |db_tx| {
            let found = ctx
                .guard(
                    expenditures::Entity::find_by_id(request.id.clone())
                        .find_also_related(labels::Entity)
                        .one(&db_tx),
                )
                .await?;
            match found {
                Some(row) => Outcome::success(into_detail(row)?),
                None => expenditure_not_found(GetExpenditure::OPERATION, &request.id),
            }
        })
    }
}

#[async_trait]
impl Handler<GetExpenditures> for Expenditures {
    async fn handle(
        &self,
        request: GetExpenditures,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<Page<ExpenditureDetail>>> {
        with_tx!(ctx, |db_tx| {
            let rows = ctx
                .guard(
                    expenditures::Entity::find()
                        .find_also_related(labels::Entity)
                        .order_by_desc(expenditures::Column::CreatedOnUtc)
                        .order_by_desc(expenditures::Column::Id)
                        .offset(request.page.offset())
                        .limit(request.page.limit())
                        .all(&db_tx),
                )
                .await?;
            let items = rows
                .into_iter()
                .map(into_detail)
                .collect::<ResultEngine<Vec<_>>>()?;
            Outcome::success(Page::from_window(items, request.page))
        })
    }
}

#[async_trait]
impl Handler<UpdateExpenditure> for Expenditures {
    async fn handle(
        &self,
        request: UpdateExpenditure,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<()>> {
        with_tx!(ctx, |db_tx| {
            let Some(mut expenditure) = find_expenditure(ctx, &db_tx, &request.id).await? else {
                return Ok(expenditure_not_found(
                    UpdateExpenditure::OPERATION,
                    &request.id,
                ));
            };
            let Some(label) =
                find_usable_label(ctx, &db_tx, &request.label_id, LabelKind::Expenditure).await?
            else {
                return Ok(label_not_found(
                    UpdateExpenditure::OPERATION,
                    &request.label_id,
                ));
            };
            expenditure.update(
                request.payment_name,
                request.amount,
                request.payment_date_on_utc,
                &label,
                ctx.clock(),
            );
            ctx.guard(expenditures::ActiveModel::from(&expenditure).update(&db_tx))
                .await?;
            tracing::info!(expenditure_id = expenditure.id(), "expenditure updated");
            Outcome::success(())
        })
    }
}

#[async_trait]
impl Handler<DeleteExpenditure> for Expenditures {
    async fn handle(
        &self,
        request: DeleteExpenditure,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<()>> {
        with_tx!(ctx, |db_tx| {
            let deleted = ctx
                .guard(expenditures::Entity::delete_by_id(request.id.clone()).exec(&db_tx))
                .await?;
            if deleted.rows_affected == 0 {
                return Ok(expenditure_not_found(
                    DeleteExpenditure::OPERATION,
                    &request.id,
                ));
            }
            tracing::info!(expenditure_id = request.id.as_str(), "expenditure deleted");
            Outcome::success(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;
    use chrono::{TimeZone, Utc};

    fn create() -> CreateExpenditure {
        CreateExpenditure {
            payment_name: "Milk".to_string(),
            amount: Decimal::new(350, 2),
            payment_date_on_utc: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            label_id: "l_01HMZ3".to_string(),
        }
    }

    #[test]
    fn well_formed_create_passes() {
        assert!(check(&create()).is_empty());
    }

    #[test]
    fn payment_name_is_capped_at_one_hundred() {
        let request = CreateExpenditure {
            payment_name: "x".repeat(101),
            ..create()
        };
        assert_eq!(
            check(&request),
            vec![
                "The length of 'Payment Name' must be 100 characters or fewer. You entered 101 characters."
                    .to_string()
            ]
        );
    }

    #[test]
    fn update_requires_id_before_fields() {
        let request = UpdateExpenditure {
            id: String::new(),
            payment_name: "Milk".to_string(),
            amount: Decimal::ZERO,
            payment_date_on_utc: crate::min_date(),
            label_id: String::new(),
        };
        assert_eq!(
            check(&request),
            vec![
                "'Id' must not be empty.".to_string(),
                "'Amount' must be greater than '0'.".to_string(),
                "'Payment Date' must be greater than '0001-01-01'.".to_string(),
                "'Label Id' must not be empty.".to_string(),
            ]
        );
    }

    #[test]
    fn missing_label_row_is_corruption() {
        let clock = crate::FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap());
        let label = Label::create("Groceries", false, &clock);
        let expenditure = Expenditure::create(
            "Milk",
            Decimal::new(350, 2),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            &label,
            &clock,
        );
        let active = expenditures::ActiveModel::from(&expenditure);
        let model = expenditures::Model {
            id: active.id.unwrap(),
            payment_name: active.payment_name.unwrap(),
            amount: active.amount.unwrap(),
            payment_date_on_utc: active.payment_date_on_utc.unwrap(),
            label_id: active.label_id.unwrap(),
            created_on_utc: active.created_on_utc.unwrap(),
            updated_on_utc: active.updated_on_utc.unwrap(),
        };

        let err = into_detail((model, None)).unwrap_err();
        assert!(matches!(err, EngineError::CorruptRecord(_)));
    }
}
