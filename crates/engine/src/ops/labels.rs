use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    Failure, Label, LabelKind, Outcome, Page, PageRequest, ResultEngine,
    dispatch::{Context, Handler, Registry, Request},
    labels,
    validation::{Rules, Validate},
};

use super::with_tx;

const MAX_NAME: usize = 500;

pub(super) fn register(registry: &mut Registry) -> ResultEngine<()> {
    registry.register::<CreateLabel, _>(Labels)?;
    registry.register::<GetLabel, _>(Labels)?;
    registry.register::<GetLabels, _>(Labels)?;
    registry.register::<UpdateLabel, _>(Labels)?;
    registry.register::<DeleteLabel, _>(Labels)
}

/// Create a label. Succeeds with the new label id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateLabel {
    pub name: String,
    pub is_income: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetLabel {
    pub id: String,
}

/// List labels, newest first.
///
/// Without a `kind` every label is listed, soft-deleted ones included. With a
/// `kind` only the labels still usable for that kind of record are listed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetLabels {
    pub page: PageRequest,
    pub kind: Option<LabelKind>,
}

/// Rename a label or move it to the other kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateLabel {
    pub id: String,
    pub name: String,
    pub is_income: bool,
}

/// Soft-delete a label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteLabel {
    pub id: String,
}

impl Validate for CreateLabel {
    fn validate(&self, rules: &mut Rules) {
        rules.required_text("Name", &self.name, MAX_NAME);
    }
}

impl Validate for GetLabel {
    fn validate(&self, rules: &mut Rules) {
        rules.not_empty("Id", &self.id);
    }
}

impl Validate for GetLabels {
    fn validate(&self, rules: &mut Rules) {
        self.page.validate(rules);
    }
}

impl Validate for UpdateLabel {
    fn validate(&self, rules: &mut Rules) {
        rules
            .not_empty("Id", &self.id)
            .required_text("Name", &self.name, MAX_NAME);
    }
}

impl Validate for DeleteLabel {
    fn validate(&self, rules: &mut Rules) {
        rules.not_empty("Id", &self.id);
    }
}

impl Request for CreateLabel {
    type Response = String;
    const OPERATION: &'static str = "CreateLabel";
}

impl Request for GetLabel {
    type Response = Label;
    const OPERATION: &'static str = "GetLabel";
}

impl Request for GetLabels {
    type Response = Page<Label>;
    const OPERATION: &'static str = "GetLabels";
}

impl Request for UpdateLabel {
    type Response = ();
    const OPERATION: &'static str = "UpdateLabel";
}

impl Request for DeleteLabel {
    type Response = ();
    const OPERATION: &'static str = "DeleteLabel";
}

pub(super) fn label_not_found<T>(operation: &str, id: &str) -> Outcome<T> {
    Outcome::failure(Failure::not_found(operation, "Label", id))
}

async fn find_label(
    ctx: &Context<'_>,
    db_tx: &DatabaseTransaction,
    id: &str,
) -> ResultEngine<Option<Label>> {
    let model = ctx
        .guard(labels::Entity::find_by_id(id.to_string()).one(db_tx))
        .await?;
    Ok(model.map(Label::from))
}

/// Resolve a label an expenditure or income may be attached to.
///
/// A label that is missing, soft-deleted or of the other kind resolves to
/// `None`.
pub(super) async fn find_usable_label(
    ctx: &Context<'_>,
    db_tx: &DatabaseTransaction,
    id: &str,
    kind: LabelKind,
) -> ResultEngine<Option<Label>> {
    let label = find_label(ctx, db_tx, id).await?;
    Ok(label.filter(|label| !label.is_deleted() && label.kind() == kind))
}

/// Handles every label request.
struct Labels;

#[async_trait]
impl Handler<CreateLabel> for Labels {
    async fn handle(
        &self,
        request: CreateLabel,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<String>> {
        with_tx!(ctx, |db_tx| {
            let label = Label::create(request.name, request.is_income, ctx.clock());
            ctx.guard(labels::ActiveModel::from(&label).insert(&db_tx))
                .await?;
            tracing::info!(label_id = label.id(), "label created");
            Outcome::success(label.id().to_string())
        })
    }
}

#[async_trait]
impl Handler<GetLabel> for Labels {
    async fn handle(&self, request: GetLabel, ctx: &Context<'_>) -> ResultEngine<Outcome<Label>> {
        with_tx!(ctx, |db_tx| {
            match find_label(ctx, &db_tx, &request.id).await? {
                Some(label) => Outcome::success(label),
                None => label_not_found(GetLabel::OPERATION, &request.id),
            }
        })
    }
}

#[async_trait]
impl Handler<GetLabels> for Labels {
    async fn handle(
        &self,
        request: GetLabels,
        ctx: &Context<'_>,
    ) -> ResultEngine<Outcome<Page<Label>>> {
        with_tx!(ctx, |db_tx| {
            let mut query = labels::Entity::find();
            if let Some(kind) = request.kind {
                query = query
                    .filter(labels::Column::IsIncome.eq(kind.is_income()))
                    .filter(labels::Column::IsDeleted.eq(false));
            }
            let models = ctx
                .guard(
                    query
                        .order_by_desc(labels::Column::CreatedOnUtc)
                        .order_by_desc(labels::Column::Id)
                        .offset(request.page.offset())
                        .limit(request.page.limit())
                        .all(&db_tx),
                )
                .await?;
            let items = models.into_iter().map(Label::from).collect();
            Outcome::success(Page::from_window(items, request.page))
        })
    }
}

#[async_trait]
impl Handler<UpdateLabel> for Labels {
    async fn handle(&self, request: UpdateLabel, ctx: &Context<'_>) -> ResultEngine<Outcome<()>> {
        with_tx!(ctx, |db_tx| {
            let Some(mut label) = find_label(ctx, &db_tx, &request.id).await? else {
                return Ok(label_not_found(UpdateLabel::OPERATION, &request.id));
            };
            label.update(request.name, request.is_income, ctx.clock());
            ctx.guard(labels::ActiveModel::from(&label).update(&db_tx))
                .await?;
            tracing::info!(label_id = label.id(), "label updated");
            Outcome::success(())
        })
    }
}

#[async_trait]
impl Handler<DeleteLabel> for Labels {
    async fn handle(&self, request: DeleteLabel, ctx: &Context<'_>) -> ResultEngine<Outcome<()>> {
        with_tx!(ctx, |db_tx| {
            let Some(mut label) = find_label(ctx, &db_tx, &request.id).await? else {
                return Ok(label_not_found(DeleteLabel::OPERATION, &request.id));
            };
            label.mark_deleted(ctx.clock());
            ctx.guard(labels::ActiveModel::from(&label).update(&db_tx))
                .await?;
            tracing::info!(label_id = label.id(), "label soft-deleted");
            Outcome::success(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    #[test]
    fn update_reports_every_broken_rule() {
        let request = UpdateLabel {
            id: String::new(),
            name: "x".repeat(501),
            is_income: true,
        };
        assert_eq!(
            check(&request),
            vec![
                "'Id' must not be empty.".to_string(),
                "The length of 'Name' must be 500 characters or fewer. You entered 501 characters."
                    .to_string(),
            ]
        );
    }

    #[test]
    fn listing_checks_page_window() {
        let request = GetLabels {
            page: PageRequest::new(Some(0), Some(-1)),
            kind: None,
        };
        assert_eq!(
            check(&request),
            vec![
                "'Page' must be greater than '0'.".to_string(),
                "'Page Size' must be greater than '0'.".to_string(),
            ]
        );
    }

    #[test]
    fn label_not_found_uses_operation_prefix() {
        let outcome: Outcome<()> = label_not_found("CreateIncome", "l_1");
        assert_eq!(
            outcome,
            Outcome::failure(Failure::new(
                "CreateIncome.LabelNotFound",
                "Label with ID 'l_1' was not found."
            ))
        );
    }
}
