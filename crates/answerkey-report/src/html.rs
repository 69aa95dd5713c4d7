//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use answerkey_core::model::GradeStatus;
use answerkey_core::report::{fmt_points, BatchReport, GradeReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn status_class(status: GradeStatus) -> &'static str {
    match status {
        GradeStatus::Correct => "pass",
        GradeStatus::Partial => "partial",
        GradeStatus::Incorrect => "fail",
    }
}

/// Generate an HTML report from a batch report.
pub fn generate_html(report: &BatchReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>answerkey report: {}</title>\n",
        html_escape(&report.assignment)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>answerkey report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Assignment: <strong>{}</strong> | {} graded | {} failed | mean {:.1}% | {}</p>\n",
        html_escape(&report.assignment),
        report.graded.len(),
        report.failures.len(),
        report.mean_percentage() * 100.0,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Student</th><th onclick=\"sortTable(1)\">Score</th><th onclick=\"sortTable(2)\">Percent</th><th onclick=\"sortTable(3)\">Correct</th><th onclick=\"sortTable(4)\">Partial</th><th onclick=\"sortTable(5)\">Incorrect</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for g in &report.graded {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{} / {}</td><td>{:.1}%</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&g.student),
            fmt_points(g.total_points),
            fmt_points(g.max_points),
            g.percentage() * 100.0,
            g.count(GradeStatus::Correct),
            g.count(GradeStatus::Partial),
            g.count(GradeStatus::Incorrect),
        ));
    }
    html.push_str("</tbody></table>\n");

    if !report.graded.is_empty() {
        html.push_str(&generate_bar_chart(&report.graded));
    }
    html.push_str("</section>\n");

    // Failures
    if !report.failures.is_empty() {
        html.push_str("<section class=\"failures\">\n");
        html.push_str("<h2>Failed submissions</h2>\n<ul>\n");
        for f in &report.failures {
            html.push_str(&format!(
                "<li><strong>{}</strong>: {}</li>\n",
                html_escape(&f.student),
                html_escape(&f.error)
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }

    // Per-student breakdown
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Students</h2>\n");
    for g in &report.graded {
        html.push_str(&generate_student_table(g));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &BatchReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_student_table(report: &GradeReport) -> String {
    let mut html = format!(
        "<details>\n<summary>{}: {} / {}</summary>\n",
        html_escape(&report.student),
        fmt_points(report.total_points),
        fmt_points(report.max_points)
    );
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>Problem</th><th>Status</th><th>Points</th><th>Answer</th><th>Solution</th><th>Feedback</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for p in &report.problems {
        let r = &p.result;
        let answer = if p.answered {
            html_escape(&r.student_answer)
        } else {
            "<em>unanswered</em>".to_string()
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}/{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            status_class(r.status),
            html_escape(&p.number),
            r.status,
            fmt_points(r.points_awarded),
            fmt_points(r.max_points),
            answer,
            html_escape(r.canonical_answer.as_deref().unwrap_or("-")),
            html_escape(&r.feedback_text),
        ));
    }
    html.push_str("</tbody></table>\n</details>\n");
    html
}

fn generate_bar_chart(graded: &[GradeReport]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = graded.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, g) in graded.iter().enumerate() {
        let score = g.percentage().clamp(0.0, 1.0);
        let y = i * (bar_height + padding) + padding;
        let width = (score * max_width as f64) as usize;

        let color = if score >= 0.8 {
            "#22c55e"
        } else if score >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&g.student)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            score * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --partial: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --partial: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.partial { background: var(--partial); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
