use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseTransaction, QueryOrder, QuerySelect, prelude::*};

use crate::{
    EngineError, Failure, Income, Label, LabelKind, Outcome, Page, PageRequest, ResultEngine,
    dispatch::{Context, Handler, Registry, Request},
    incomes, labels,
    validation::{Rules, Validate},
};

use super::{
    labels::{find_usable_label, label_not_found},
    with_tx,
};

const MAX_INCOME_NAME: usize = 500;
const MAX_LABEL_ID: usize = 500;

pub(super) fn register(registry: &mut Registry) -> ResultEngine<()> {
    registry.register::<CreateIncome, _>(Incomes)?;
    registry.register::<GetIncome, _>(Incomes)?;
    registry.register::<GetIncomes, _>(Incomes)?;
    registry.register::<UpdateIncome, _>(Incomes)?;
    registry.register::<DeleteIncome, _>(Incomes)
}

/// An income together with the label it points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomeDetail {
    pub income: Income,
    pub label: Label,
}

/// Record an income. Succeeds with the new income id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateIncome {
    pub income_name: String,
    pub amount: Decimal,
    pub income_date_on_utc: NaiveDate,
    pub label_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetIncome {
    pub id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetIncomes {
    pub page: PageRequest,
}

/// Replace every field of an existing income.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateIncome {
    pub id: String,
    pub income_name: String,
    pub amount: Decimal,
    pub income_date_on_utc: NaiveDate,
    pub label_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteIncome {
    pub id: String,
}

fn validate_fields(
    rules: &mut Rules,
    income_name: &str,
    amount: Decimal,
    income_date_on_utc: NaiveDate,
    label_id: &str,
) {
    rules
        .required_text("Income Name", income_name, MAX_INCOME_NAME)
        .positive_amount("Amount", amount)
        .after_min_date("Income Date", income_date_on_utc)
        .required_text("Label Id", label_id, MAX_LABEL_ID);
}

impl Validate for CreateIncome {
    fn validate(&self, rules: &mut Rules) {
        validate_fields(
            rules,
            &self.income_name,
            self.amount,
            self.income_date_on_utc,
            &self.label_id,
        );
    }
}

impl Validate for GetIncome {
    fn validate(&self, rules: &mut Rules) {
        rules.not_empty("Id", &self.id);
    }
}

impl Validate for GetIncomes {
    fn validate(&self, rules: &mut Rules) {
        self.page.validate(rules);
    }
}

impl Validate for UpdateIncome {
    fn validate(&self, rules: &mut Rules) {
        rules.not_empty("Id", &self.id);
        validate_fields(
            rules,
            &self.income_name,
            self.amount,
            self.income_date_on_utc,
            &self.label_id,
        );
    }
}

impl Validate for DeleteIncome {
    fn validate(&self, rules: &mut Rules) {
        rules.not_empty("Id", &self.id);
    }
}

impl Request for CreateIncome {
    type Response = String;
    const OPERATION: &'static str = "CreateIncome";
}

impl Request for GetIncome {
    type Response = IncomeDetail;
    const OPERATION: &'static str = "GetIncome";
}

impl Request for GetIncomes {
    type Response = Page<IncomeDetail>;
    const OPERATION: &'static str = "GetIncomes";
}

impl Request for UpdateIncome {
    type Response = ();
    const OPERATION: &'static str = "UpdateIncome";
}

impl Request for DeleteIncome {
    type Response = ();
    const OPERATION: &'static str = "DeleteIncome";
}

fn income_not_found<T>(operation: &str, id: &str) -> Outcome<T> {
    Outcome::failure(Failure::not_found(operation, "Income", id))
}

fn into_detail(
    (model, label): (incomes::Model, Option<labels::Model>),
) -> ResultEngine<IncomeDetail> {
    let label = label.ok_or_else(|| {
        EngineError::CorruptRecord(format!(
            "income '{}' points at missing label '{}'",
            model.id, model.label_id
        ))
    })?;
    Ok(IncomeDetail {
        income: Income::try_from(model)?,
        label: Label::from(label),
    })
}

async fn find_income(
    ctx: &Context<'_>,
    db_tx: &DatabaseTransaction,
    id: &str,
) -> ResultEngine<Option<Income>> {
    let model = ctx
        .guard(incomes::Entity::find_by_id(id.to_string()).one(db_tx))
        .await?;
    model.map(Income::try_from).transpose()
}

/// Handles every income request.
struct Incomes;

#[async_trait]
impl Handler<CreateIncome> for Incomes {
    async fn handle(
        &self,
        request: CreateIncome,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<String>> {
        with_tx!(ctx, |db_tx| {
            let Some(label) =
                find_usable_label(ctx, &db_tx, &request.label_id, LabelKind::Income).await?
            else {
                return Ok(label_not_found(
                    CreateIncome::OPERATION,
                    &request.label_id,
                ));
            };
            let income = Income::create(
                request.income_name,
                request.amount,
                request.income_date_on_utc,
                &label,
                ctx.clock(),
            );
            ctx.guard(incomes::ActiveModel::from(&income).insert(&db_tx))
                .await?;
            tracing::info!(
                income_id = income.id(),
                label_id = label.id(),
                "income created"
            );
            Outcome::success(income.id().to_string())
        })
    }
}

#[async_trait]
impl Handler<GetIncome> for Incomes {
    async fn handle(
        &self,
        request: GetIncome,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<IncomeDetail>> {
        with_tx!(ctx, |db_tx| {
            let found = ctx
                .guard(
                    incomes::Entity::find_by_id(request.id.clone())
                        .find_also_related(labels::Entity)
                        .one(&db_tx),
                )
                .await?;
            match found {
                Some(row) => Outcome::success(into_detail(row)?),
                None => income_not_found(GetIncome::OPERATION, &request.id),
            }
        })
    }
}

#[async_trait]
impl Handler<GetIncomes> for Incomes {
    async fn handle(
        &self,
        request: GetIncomes,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<Page<IncomeDetail>>> {
        with_tx!(ctx, |db_tx| {
            let rows = ctx
                .guard(
                    incomes::Entity::find()
                        .find_also_related(labels::Entity)
                        .order_by_desc(incomes::Column::CreatedOnUtc)
                        .order_by_desc(incomes::Column::Id)
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
impl Handler<UpdateIncome> for Incomes {
    async fn handle(
        &self,
        request: UpdateIncome,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<()>> {
        with_tx!(ctx, |db_tx| {
            let Some(mut income) = find_income(ctx, &db_tx, &request.id).await? else {
                return Ok(income_not_found(
                    UpdateIncome::OPERATION,
                    &request.id,
                ));
            };
            let Some(label) =
                find_usable_label(ctx, &db_tx, &request.label_id, LabelKind::Income).await?
            else {
                return Ok(label_not_found(
                    UpdateIncome::OPERATION,
                    &request.label_id,
                ));
            };
            income.update(
                request.income_name,
                request.amount,
                request.income_date_on_utc,
                &label,
                ctx.clock(),
            );
            ctx.guard(incomes::ActiveModel::from(&income).update(&db_tx))
                .await?;
            tracing::info!(income_id = income.id(), "income updated");
            Outcome::success(())
        })
    }
}

#[async_trait]
impl Handler<DeleteIncome> for Incomes {
    async fn handle(
        &self,
        request: DeleteIncome,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<()>> {
        with_tx!(ctx, |db_tx| {
            let deleted = ctx
                .guard(incomes::Entity::delete_by_id(request.id.clone()).exec(&db_tx))
                .await?;
            if deleted.rows_affected == 0 {
                return Ok(income_not_found(
                    DeleteIncome::OPERATION,
                    &request.id,
                ));
            }
            tracing::info!(income_id = request.id.as_str(), "income deleted");
            Outcome::success(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    fn create() -> CreateIncome {
        CreateIncome {
            income_name: "Salary".to_string(),
            amount: Decimal::new(250_000, 2),
            income_date_on_utc: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            label_id: "l_01HMZ3".to_string(),
        }
    }

    #[test]
    fn income_name_allows_five_hundred_characters() {
        let request = CreateIncome {
            income_name: "x".repeat(500),
            ..create()
        };
        assert!(check(&request).is_empty());

        let request = CreateIncome {
            income_name: "x".repeat(501),
            ..create()
        };
        assert_eq!(
            check(&request),
            vec![
                "The length of 'Income Name' must be 500 characters or fewer. You entered 501 characters."
                    .to_string()
            ]
        );
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let request = CreateIncome {
            income_name: String::new(),
            amount: Decimal::ZERO,
            income_date_on_utc: crate::min_date(),
            label_id: String::new(),
        };
        assert_eq!(
            check(&request),
            vec![
                "'Income Name' must not be empty.".to_string(),
                "'Amount' must be greater than '0'.".to_string(),
                "'Income Date' must be greater than '0001-01-01'.".to_string(),
                "'Label Id' must not be empty.".to_string(),
            ]
        );
    }

    #[test]
    fn delete_requires_id() {
        let request = DeleteIncome { id: " ".to_string() };
        assert_eq!(check(&request), vec!["'Id' must not be empty.".to_string()]);
    }

    #[test]
    fn not_found_names_the_income() {
        let outcome: Outcome<()> = income_not_found(UpdateIncome::OPERATION, "i_9");
        assert_eq!(
            outcome,
            Outcome::failure(Failure::new(
                "UpdateIncome.IncomeNotFound",
                "Income with ID 'i_9' was not found."
            ))
        );
    }
}
