//! Human-readable verification report.

use crate::{VerificationSummary, VerifyStatus};
use std::io::Write;

/// Print a report of the verification results, failures first.
pub fn print_report(summary: &VerificationSummary, writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer, "\n=== Replay Verification Report ===")?;
    writeln!(writer)?;

    writeln!(
        writer,
        "Total: {} | Passed: {} | Failed: {}",
        summary.total, summary.passed, summary.failed
    )?;
    if summary.total > 0 {
        writeln!(writer, "Pass Rate: {:.1}%", summary.pass_rate())?;
    }
    writeln!(writer)?;

    let failures: Vec<_> = summary
        .results
        .iter()
        .filter(|r| r.status == VerifyStatus::Fail)
        .collect();

    if !failures.is_empty() {
        writeln!(writer, "--- FAILURES ---")?;
        for result in &failures {
            writeln!(
                writer,
                "[FAIL] {}: expected={:.6}, actual={:.6}, delta={:.6}",
                result.metric, result.expected, result.actual, result.delta
            )?;
            if let Some(details) = &result.details {
                writeln!(writer, "       {}", details)?;
            }
        }
        writeln!(writer)?;
    }

    writeln!(writer, "--- PASSES ---")?;
    for result in summary
        .results
        .iter()
        .filter(|r| r.status == VerifyStatus::Pass)
    {
        write!(writer, "[PASS] {}", result.metric)?;
        if let Some(details) = &result.details {
            write!(writer, ": {}", details)?;
        }
        writeln!(writer)?;
    }
    writeln!(writer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VerifyResult;

    #[test]
    fn test_report_lists_failures_first() {
        let mut summary = VerificationSummary::default();
        summary.compare("ok_metric", 1.0, 1.0);
        summary.push(VerifyResult {
            metric: "bad_metric".into(),
            expected: 1.0,
            actual: 2.0,
            delta: 1.0,
            status: VerifyStatus::Fail,
            details: Some("diverged".into()),
        });

        let mut buf = Vec::new();
        print_report(&summary, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("--- FAILURES ---"));
        assert!(text.contains("[FAIL] bad_metric"));
        assert!(text.contains("diverged"));
        assert!(text.contains("[PASS] ok_metric"));
        let fail_pos = text.find("[FAIL]").unwrap();
        let pass_pos = text.find("[PASS]").unwrap();
        assert!(fail_pos < pass_pos);
    }
}
