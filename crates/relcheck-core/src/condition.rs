//! Release-readiness condition registry.
//!
//! A [`ConditionSet`] holds named, described checks in insertion order.
//! [`ConditionSet::test_all`] evaluates every one of them, never stopping
//! early, and records each outcome in a [`TestResult`]. The pass/fail flag
//! and the error of an outcome are independent: a check may report
//! `passed = true` together with an error, and both are kept.

use std::fmt;
use std::ops::Index;

use serde::{Serialize, Serializer};
use tracing::debug;

// ---------------------------------------------------------------------------
// Check outcome
// ---------------------------------------------------------------------------

/// What a single check reports.
#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub passed: bool,
    pub error: Option<anyhow::Error>,
}

impl CheckOutcome {
    pub fn new(passed: bool, error: Option<anyhow::Error>) -> Self {
        Self { passed, error }
    }

    pub fn pass() -> Self {
        Self::new(true, None)
    }

    pub fn fail() -> Self {
        Self::new(false, None)
    }

    /// Attach an error, keeping the pass/fail flag as is.
    pub fn with_error(mut self, error: impl Into<anyhow::Error>) -> Self {
        self.error = Some(error.into());
        self
    }
}

impl From<bool> for CheckOutcome {
    fn from(passed: bool) -> Self {
        Self::new(passed, None)
    }
}

/// `Ok(b)` → `(b, None)`; `Err(e)` → `(false, Some(e))`.
impl<E> From<Result<bool, E>> for CheckOutcome
where
    E: Into<anyhow::Error>,
{
    fn from(result: Result<bool, E>) -> Self {
        match result {
            Ok(passed) => Self::new(passed, None),
            Err(err) => Self::new(false, Some(err.into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Check capability
// ---------------------------------------------------------------------------

/// Something that can be evaluated to a [`CheckOutcome`].
///
/// Implemented for every `Fn() -> O` where `O: Into<CheckOutcome>`, so
/// closures returning `bool`, `Result<bool, E>` or `CheckOutcome` all work.
pub trait Check {
    fn evaluate(&self) -> CheckOutcome;
}

impl<F, O> Check for F
where
    F: Fn() -> O,
    O: Into<CheckOutcome>,
{
    fn evaluate(&self) -> CheckOutcome {
        self().into()
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A named, described check. Immutable once added to a set.
pub struct Condition {
    name: String,
    description: String,
    check: Box<dyn Check>,
}

impl Condition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn evaluate(&self) -> CheckOutcome {
        self.check.evaluate()
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Ordered, append-only collection of conditions. Names need not be unique.
#[derive(Debug, Default)]
pub struct ConditionSet {
    conditions: Vec<Condition>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        check: impl Check + 'static,
    ) -> &mut Self {
        self.conditions.push(Condition {
            name: name.into(),
            description: description.into(),
            check: Box::new(check),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    /// Evaluate every condition in insertion order.
    ///
    /// Always runs the full set; a failing or erroring check is recorded in
    /// its own result and evaluation moves on.
    pub fn test_all(&self) -> TestResults {
        let span = tracing::debug_span!("relcheck.test_all", conditions = self.conditions.len());
        let _guard = span.enter();

        let mut results = Vec::with_capacity(self.conditions.len());
        for condition in &self.conditions {
            let outcome = condition.evaluate();
            match &outcome.error {
                Some(err) => debug!(
                    condition = %condition.name,
                    passed = outcome.passed,
                    error = %err,
                    "condition evaluated with error"
                ),
                None => debug!(
                    condition = %condition.name,
                    passed = outcome.passed,
                    "condition evaluated"
                ),
            }
            results.push(TestResult {
                name: condition.name.clone(),
                description: condition.description.clone(),
                passed: outcome.passed,
                error: outcome.error,
            });
        }

        let results = TestResults(results);
        debug!(
            total = results.len(),
            passed = results.passed_count(),
            all_passed = results.all_passed(),
            "condition set evaluated"
        );
        results
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of one condition.
#[derive(Debug, Serialize)]
pub struct TestResult {
    pub name: String,
    pub description: String,
    pub passed: bool,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<anyhow::Error>,
}

impl TestResult {
    /// Passed and no error.
    pub fn is_ok(&self) -> bool {
        self.passed && self.error.is_none()
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<anyhow::Error>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.serialize_some(&format!("{err:#}")),
        None => serializer.serialize_none(),
    }
}

/// Results of [`ConditionSet::test_all`], in condition order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct TestResults(Vec<TestResult>);

impl TestResults {
    /// True iff every result passed with no error. Vacuously true when empty.
    pub fn all_passed(&self) -> bool {
        self.0.iter().all(TestResult::is_ok)
    }

    pub fn passed_count(&self) -> usize {
        self.0.iter().filter(|r| r.is_ok()).count()
    }

    /// Results that did not pass cleanly.
    pub fn failed(&self) -> impl Iterator<Item = &TestResult> {
        self.0.iter().filter(|r| !r.is_ok())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestResult> {
        self.0.iter()
    }
}

impl Index<usize> for TestResults {
    type Output = TestResult;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a TestResults {
    type Item = &'a TestResult;
    type IntoIter = std::slice::Iter<'a, TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for TestResults {
    type Item = TestResult;
    type IntoIter = std::vec::IntoIter<TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_empty_set_passes() {
        let set = ConditionSet::new();
        assert!(set.is_empty());
        let results = set.test_all();
        assert!(results.is_empty());
        assert!(results.all_passed());
    }

    #[test]
    fn test_mixed_outcomes_scenario() {
        let mut set = ConditionSet::new();
        set.add("A", "always passes", || true);
        set.add("B", "always fails", || false);
        set.add("C", "passes but errors", || {
            CheckOutcome::pass().with_error(anyhow::anyhow!("flaky probe"))
        });

        let results = set.test_all();
        assert_eq!(results.len(), 3);
        assert!(!results.all_passed());

        assert_eq!(results[0].name, "A");
        assert!(results[0].passed);
        assert!(results[0].error.is_none());

        assert_eq!(results[1].name, "B");
        assert!(!results[1].passed);
        assert!(results[1].error.is_none());

        assert_eq!(results[2].name, "C");
        assert!(results[2].passed);
        assert!(results[2].error.is_some());

        assert_eq!(results.passed_count(), 1);
        let failed: Vec<&str> = results.failed().map(|r| r.name.as_str()).collect();
        assert_eq!(failed, ["B", "C"]);
    }

    #[test]
    fn test_evaluates_all_without_short_circuit() {
        let calls = Rc::new(Cell::new(0));
        let mut set = ConditionSet::new();
        for i in 0..4 {
            let calls = Rc::clone(&calls);
            set.add(format!("c{i}"), "counts", move || {
                calls.set(calls.get() + 1);
                i % 2 == 0
            });
        }

        let results = set.test_all();
        assert_eq!(calls.get(), 4);
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_result_err_becomes_failed_with_error() {
        let mut set = ConditionSet::new();
        set.add("io", "reads something", || -> Result<bool, std::io::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
        });

        let results = set.test_all();
        assert!(!results[0].passed);
        assert_eq!(results[0].error.as_ref().unwrap().to_string(), "missing");
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let mut set = ConditionSet::new();
        set.add("dup", "first", || true).add("dup", "second", || true);

        let results = set.test_all();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].description, "first");
        assert_eq!(results[1].description, "second");
    }

    #[test]
    fn test_custom_check_impl() {
        struct Threshold(u32);
        impl Check for Threshold {
            fn evaluate(&self) -> CheckOutcome {
                (self.0 >= 2).into()
            }
        }

        let mut set = ConditionSet::new();
        set.add("enough", "threshold met", Threshold(3));
        set.add("too-few", "threshold missed", Threshold(1));

        let results = set.test_all();
        assert!(results[0].is_ok());
        assert!(!results[1].passed);
    }

    #[test]
    fn test_results_serialize_error_as_string() {
        let mut set = ConditionSet::new();
        set.add("ok", "fine", || true);
        set.add("bad", "broken", || {
            CheckOutcome::fail().with_error(anyhow::anyhow!("boom"))
        });

        let json = serde_json::to_value(set.test_all()).unwrap();
        assert_eq!(json[0]["name"], "ok");
        assert!(json[0]["error"].is_null());
        assert_eq!(json[1]["passed"], false);
        assert_eq!(json[1]["error"], "boom");
    }
}
