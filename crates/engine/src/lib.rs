//! Record keeping for personal finances.
//!
//! The engine owns the three record types (expenditures, incomes and the
//! labels both are filed under) and the pipeline every operation goes
//! through: a request value is checked against its rules, handed to the one
//! handler registered for its type and answered with an [`Outcome`].

pub use clock::{Clock, FixedClock, SystemClock};
pub use dispatch::{Context, Handler, Registry, Request};
pub use error::EngineError;
pub use expenditures::Expenditure;
pub use ids::IdKind;
pub use incomes::Income;
pub use labels::{Label, LabelKind};
pub use ops::{
    Engine, EngineBuilder,
    expenditures::{
        CreateExpenditure, DeleteExpenditure, ExpenditureDetail, GetExpenditure, GetExpenditures,
        UpdateExpenditure,
    },
    incomes::{CreateIncome, DeleteIncome, GetIncome, GetIncomes, IncomeDetail, UpdateIncome},
    labels::{CreateLabel, DeleteLabel, GetLabel, GetLabels, UpdateLabel},
};
pub use outcome::{Failure, Outcome};
pub use pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, Page, PageRequest};
pub use tokio_util::sync::CancellationToken;
pub use validation::{Rules, Validate, min_date};

mod clock;
mod dispatch;
mod error;
mod expenditures;
mod ids;
mod incomes;
mod labels;
mod ops;
mod outcome;
mod pagination;
mod validation;

pub type ResultEngine<T> = Result<T, EngineError>;
