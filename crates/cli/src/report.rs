use crate::datasets::DownloadReport;
use crate::pipeline::{EvaluateReport, RunReport};
use kpm_eval::{Evaluation, Metric};

pub fn render_run_summary(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Matcher:     {} ({})\n",
        report.matcher, report.matcher_name
    ));
    if report.cached_model {
        out.push_str("Model:       loaded from cache\n");
    }
    out.push_str(&format!(
        "Split:       {} ({} arguments, {} key points)\n",
        report.split, report.arguments, report.key_points
    ));
    out.push_str(&format!(
        "Predictions: {} ({} pairs)\n",
        report.predictions, report.predicted_pairs
    ));
    match &report.evaluation {
        Some(evaluation) => {
            out.push('\n');
            out.push_str(&render_evaluation_table(evaluation));
        }
        None => out.push_str("\nNo labels available; predictions were not evaluated.\n"),
    }
    out
}

pub fn render_evaluate_summary(report: &EvaluateReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Predictions: {} ({} pairs)\n",
        report.predictions, report.predicted_pairs
    ));
    out.push_str(&format!("Split:       {}\n\n", report.split));
    out.push_str(&render_evaluation_table(&report.evaluation));
    out
}

pub fn render_download_summary(report: &DownloadReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Data directory: {}\n", report.data_dir));
    out.push_str(&format!("Downloaded:     {}\n", list(&report.downloaded)));
    out.push_str(&format!("Skipped:        {}\n", list(&report.skipped)));
    out
}

pub fn render_metric_list(metrics: &[Box<dyn Metric>]) -> String {
    let width = metrics
        .iter()
        .map(|metric| metric.slug().len())
        .max()
        .unwrap_or(0);
    metrics
        .iter()
        .map(|metric| format!("{:width$}  {}\n", metric.slug(), metric.name()))
        .collect()
}

fn render_evaluation_table(evaluation: &Evaluation) -> String {
    let mut out = String::new();
    out.push_str("| metric | strict | relaxed | mean |\n");
    out.push_str("|---|---:|---:|---:|\n");
    out.push_str(&format!(
        "| `{}` | `{:.3}` | `{:.3}` | `{:.3}` |\n",
        evaluation.metric,
        evaluation.strict,
        evaluation.relaxed,
        evaluation.mean()
    ));
    out
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
