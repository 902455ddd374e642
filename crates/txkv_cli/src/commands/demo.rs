//! Demo command implementation.

use std::fmt;
use txkv_core::Database;

/// A database call made by one demo step.
#[derive(Debug, Clone, Copy)]
enum Action {
    Get(&'static str),
    Put(&'static str, i32),
    Begin,
    Commit,
    Rollback,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Get(key) => write!(f, "get({key:?})"),
            Action::Put(key, value) => write!(f, "put({key:?}, {value})"),
            Action::Begin => write!(f, "begin_transaction()"),
            Action::Commit => write!(f, "commit()"),
            Action::Rollback => write!(f, "rollback()"),
        }
    }
}

/// What a step returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Absent,
    Value(i32),
    Success,
    Error,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Absent => write!(f, "absent"),
            Outcome::Value(value) => write!(f, "{value}"),
            Outcome::Success => write!(f, "success"),
            Outcome::Error => write!(f, "error"),
        }
    }
}

/// The scripted scenario: each step and the outcome it must produce.
const SCENARIO: &[(Action, Outcome)] = &[
    (Action::Get("A"), Outcome::Absent),
    (Action::Put("A", 5), Outcome::Error),
    (Action::Begin, Outcome::Success),
    (Action::Put("A", 5), Outcome::Success),
    (Action::Get("A"), Outcome::Absent),
    (Action::Put("A", 6), Outcome::Success),
    (Action::Commit, Outcome::Success),
    (Action::Get("A"), Outcome::Value(6)),
    (Action::Commit, Outcome::Error),
    (Action::Rollback, Outcome::Error),
    (Action::Get("B"), Outcome::Absent),
    (Action::Begin, Outcome::Success),
    (Action::Put("B", 10), Outcome::Success),
    (Action::Rollback, Outcome::Success),
    (Action::Get("B"), Outcome::Absent),
];

/// Result of one executed step.
#[derive(Debug)]
struct StepReport {
    action: Action,
    expected: Outcome,
    actual: Outcome,
    detail: Option<String>,
}

impl StepReport {
    fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

fn execute(db: &mut Database<'static>, action: Action) -> (Outcome, Option<String>) {
    let status = |result: txkv_core::CoreResult<()>| match result {
        Ok(()) => (Outcome::Success, None),
        Err(err) => (Outcome::Error, Some(err.to_string())),
    };

    match action {
        Action::Get(key) => match db.get(key) {
            Some(&value) => (Outcome::Value(value), None),
            None => (Outcome::Absent, None),
        },
        Action::Put(key, value) => status(db.put(key, value)),
        Action::Begin => status(db.begin().map(|_| ())),
        Action::Commit => status(db.commit().map(|_| ())),
        Action::Rollback => status(db.rollback()),
    }
}

fn run_scenario() -> Vec<StepReport> {
    let mut db = Database::new();
    let reports = SCENARIO
        .iter()
        .map(|&(action, expected)| {
            let (actual, detail) = execute(&mut db, action);
            StepReport {
                action,
                expected,
                actual,
                detail,
            }
        })
        .collect();
    db.destroy();
    reports
}

/// Runs the demo command.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== txkv transaction demo ===");
    println!();

    let reports = run_scenario();
    for (index, report) in reports.iter().enumerate() {
        println!("Step {}: {}", index + 1, report.action);
        match &report.detail {
            Some(detail) => println!("  Result: {} ({})", report.actual, detail),
            None => println!("  Result: {}", report.actual),
        }
        if report.passed() {
            println!("  Expected: {} ✓", report.expected);
        } else {
            println!("  Expected: {} ✗", report.expected);
        }
        println!();
    }

    let failed = reports.iter().filter(|report| !report.passed()).count();
    if failed == 0 {
        println!("✓ All {} steps matched", reports.len());
        Ok(())
    } else {
        println!("✗ {} of {} steps did not match", failed, reports.len());
        Err("Demo scenario mismatch".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_matches_expectations() {
        let reports = run_scenario();
        assert_eq!(reports.len(), 15);
        assert!(reports.iter().all(StepReport::passed));
    }

    #[test]
    fn failed_steps_carry_error_text() {
        let reports = run_scenario();
        assert_eq!(
            reports[1].detail.as_deref(),
            Some("no active transaction")
        );
        assert!(reports[0].detail.is_none());
    }
}
