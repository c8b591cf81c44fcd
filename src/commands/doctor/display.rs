//! Display and reporting functions for the doctor command.

use super::{DoctorReport, IssueSeverity};

/// Print the doctor report.
pub fn print_report(report: &DoctorReport) {
    for line in &report.passed {
        println!("  ok  {}", line);
    }

    if report.issues.is_empty() {
        println!();
        println!("Everything looks good.");
        return;
    }

    println!();
    println!("Issues detected ({}):", report.issues.len());
    println!();

    for (i, issue) in report.issues.iter().enumerate() {
        println!(
            "  {}. [{}] {} - {}",
            i + 1,
            issue.severity,
            issue.category,
            issue.description.lines().next().unwrap_or_default()
        );

        if let Some(remediation) = &issue.remediation {
            println!(
                "     Fix:  {}",
                remediation.lines().next().unwrap_or(remediation)
            );
            for line in remediation.lines().skip(1) {
                println!("           {}", line);
            }
        }

        println!();
    }

    let error_count = report
        .issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Error)
        .count();
    let warning_count = report.issues.len() - error_count;
    println!(
        "Summary: {} errors, {} warnings.",
        error_count, warning_count
    );
}
