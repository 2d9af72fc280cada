//! Human-readable rendering of report messages

use colored::Colorize;

use super::protocol::{Report, TestResult};

/// Render a single result line
pub fn format_line(result: &TestResult) -> String {
    if result.passed {
        result.message.green().to_string()
    } else {
        result.message.red().to_string()
    }
}

/// Render the end-of-run summary
pub fn format_summary(report: &Report) -> String {
    let total = report.results.len();
    let passed = total - report.error_count;

    if report.passed() {
        format!(
            "{} {} in {:.2}s",
            "✓".green().bold(),
            format!("{} of {} tests passed", passed, total).green().bold(),
            report.duration
        )
    } else {
        format!(
            "{} {} in {:.2}s",
            "✗".red().bold(),
            format!("{} of {} tests failed", report.error_count, total).red().bold(),
            report.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        colored::control::set_override(false);

        let report = Report::new(
            vec![TestResult::pass("a"), TestResult::fail("b", &"nope")],
            1.0,
        );
        assert_eq!(format_summary(&report), "✗ 1 of 2 tests failed in 1.00s");

        let report = Report::new(vec![TestResult::pass("a")], 0.25);
        assert_eq!(format_summary(&report), "✓ 1 of 1 tests passed in 0.25s");
        assert_eq!(format_line(&report.results[0]), "a  ✅");
    }
}
