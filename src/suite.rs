use crate::context::TestContext;
use crate::network::client::ClientError;
use crate::tx::{TxError, TxOutcome};
use futures::future::BoxFuture;
use std::fmt;
use std::time::Instant;

#[derive(thiserror::Error, Debug)]
pub enum CaseError {
    #[error("Client error: {0}")]
    ClientError(#[from] ClientError),
    #[error("Transaction error: {0}")]
    TxError(#[from] TxError),
    #[error("{what}: expected `{expected}`, got `{actual}`")]
    Assertion {
        what: &'static str,
        expected: String,
        actual: String,
    },
}

pub type CaseFuture<'a> = BoxFuture<'a, Result<(), CaseError>>;

pub struct TestCase<C> {
    pub name: &'static str,
    run: for<'a> fn(&'a TestContext<C>) -> CaseFuture<'a>,
}

impl<C> TestCase<C> {
    pub fn new(name: &'static str, run: for<'a> fn(&'a TestContext<C>) -> CaseFuture<'a>) -> Self {
        Self { name, run }
    }
}

pub fn expect_eq<T>(what: &'static str, actual: T, expected: T) -> Result<(), CaseError>
where
    T: PartialEq + fmt::Display,
{
    if actual == expected {
        return Ok(());
    }
    Err(CaseError::Assertion {
        what,
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}

pub fn expect_some<T>(what: &'static str, value: Option<T>) -> Result<T, CaseError> {
    value.ok_or_else(|| CaseError::Assertion {
        what,
        expected: "a value".to_string(),
        actual: "none".to_string(),
    })
}

pub fn expect_finalized(outcome: &TxOutcome) -> Result<(), CaseError> {
    if outcome.is_finalized() {
        return Ok(());
    }
    Err(CaseError::Assertion {
        what: "outcome",
        expected: "finalized without dispatch error".to_string(),
        actual: outcome.to_string(),
    })
}

#[derive(Debug)]
pub struct CaseReport {
    pub name: &'static str,
    pub error: Option<CaseError>,
}

#[derive(Debug)]
pub struct SuiteReport {
    pub title: String,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|case| case.error.is_none()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|case| case.error.is_some())
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Runs `cases` one after another against a shared context. A failing case
/// does not stop the ones after it.
pub async fn run_suite<C>(context: &TestContext<C>, title: &str, cases: &[TestCase<C>]) -> SuiteReport {
    tracing::info!(title, cases = cases.len(), "Running suite");
    let mut reports = Vec::with_capacity(cases.len());

    for case in cases {
        let started = Instant::now();
        let result = (case.run)(context).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(()) => tracing::info!(case = case.name, elapsed_ms, "Case passed"),
            Err(e) => tracing::warn!(case = case.name, elapsed_ms, "Case failed: {}", e),
        }
        reports.push(CaseReport {
            name: case.name,
            error: result.err(),
        });
    }

    SuiteReport {
        title: title.to_string(),
        cases: reports,
    }
}
