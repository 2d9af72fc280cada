//! Test registration
//!
//! `describe` opens a labelled group and `it` appends a test case to it.
//! The group label travels with the [`Group`] value, so a case always gets
//! the label of the group it was declared in. Labels don't stack: a nested
//! group replaces the label, it doesn't extend it.

use std::fmt;
use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::common::Result;
use crate::tester::Tester;

/// Body of a test case; consumed when the case runs
pub type TestAction = Box<dyn FnOnce(Tester) -> BoxFuture<'static, Result<()>> + Send>;

/// A named test action
pub struct TestCase {
    description: String,
    action: TestAction,
}

impl TestCase {
    pub fn new<F, Fut>(description: impl Into<String>, action: F) -> Self
    where
        F: FnOnce(Tester) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            description: description.into(),
            action: Box::new(move |tester| action(tester).boxed()),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn into_parts(self) -> (String, TestAction) {
        (self.description, self.action)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of registered test cases
#[derive(Debug, Default)]
pub struct Suite {
    cases: Vec<TestCase>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a group of test cases under `label`
    ///
    /// Returns whatever `body` returns, so registration code can use `?`.
    pub fn describe<R>(
        &mut self,
        label: impl Into<String>,
        body: impl FnOnce(&mut Group<'_>) -> R,
    ) -> R {
        let mut group = Group {
            label: label.into(),
            cases: &mut self.cases,
        };
        body(&mut group)
    }

    /// Append all cases of `other`, keeping their order
    pub fn merge(&mut self, other: Suite) {
        self.cases.extend(other.cases);
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Descriptions in execution order
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(TestCase::description)
    }

    pub(crate) fn into_cases(self) -> Vec<TestCase> {
        self.cases
    }
}

/// A labelled group being declared
pub struct Group<'a> {
    label: String,
    cases: &'a mut Vec<TestCase>,
}

impl Group<'_> {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Register a test case as `"<group label>: <label>"`
    pub fn it<F, Fut>(&mut self, label: &str, action: F) -> &mut Self
    where
        F: FnOnce(Tester) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let description = format!("{}: {}", self.label, label);
        self.cases.push(TestCase::new(description, action));
        self
    }

    /// Open a group with a new label
    pub fn describe<R>(
        &mut self,
        label: impl Into<String>,
        body: impl FnOnce(&mut Group<'_>) -> R,
    ) -> R {
        let mut group = Group {
            label: label.into(),
            cases: &mut *self.cases,
        };
        body(&mut group)
    }
}
