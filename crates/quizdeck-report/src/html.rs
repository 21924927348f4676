//! HTML review page generator.
//!
//! Produces a self-contained HTML file with all CSS inlined: score summary,
//! a per-round bar chart and one card per missed question.

use anyhow::Result;
use std::path::Path;

use quizdeck_core::report::{GradeReport, WrongAnswer};
use quizdeck_core::statistics::RoundTally;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the review page for a graded session.
pub fn generate_html(report: &GradeReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>오답노트 - {} {}</title>\n",
        html_escape(&report.round_label),
        html_escape(&report.subject)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>오답노트</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">과목: <strong>{}</strong> | 회차: <strong>{}</strong> | {}</p>\n",
        html_escape(&report.subject),
        html_escape(&report.round_label),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str(&format!(
        "<p class=\"score\">{} <span class=\"pct\">({:.1}%)</span></p>\n",
        html_escape(&report.score_line()),
        report.accuracy() * 100.0
    ));
    html.push_str("</header>\n");

    // Per-round breakdown
    if !report.per_round.is_empty() {
        html.push_str("<section class=\"rounds\">\n");
        html.push_str("<h2>회차별 결과</h2>\n");
        html.push_str("<table class=\"summary\">\n");
        html.push_str("<thead><tr><th>회차</th><th>정답</th><th>문항</th><th>정답률</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for tally in &report.per_round {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td></tr>\n",
                html_escape(&tally.round.label()),
                tally.correct,
                tally.total,
                tally.accuracy() * 100.0,
            ));
        }
        html.push_str("</tbody></table>\n");
        if report.per_round.len() > 1 {
            html.push_str(&generate_bar_chart(&report.per_round));
        }
        html.push_str("</section>\n");
    }

    // Missed questions
    html.push_str("<section class=\"wrong\">\n");
    if report.wrong.is_empty() {
        html.push_str("<p class=\"perfect\">틀린 문항이 없습니다.</p>\n");
    }
    for w in &report.wrong {
        html.push_str(&wrong_card(w));
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

    html.push_str("</body>\n</html>");
    html
}

fn wrong_card(w: &WrongAnswer) -> String {
    let item = &w.item;
    let mut card = String::new();

    card.push_str("<article class=\"card\">\n");
    card.push_str(&format!(
        "<h3>{}. {} <span class=\"round\">{}</span></h3>\n",
        w.ordinal,
        html_escape(&item.display_code()),
        html_escape(&item.round.label())
    ));

    let user_class = if w.user_answer.is_some() { "mine" } else { "mine missing" };
    card.push_str(&format!(
        "<p class=\"{user_class}\">내 답: {}</p>\n",
        html_escape(w.user_answer_or_marker())
    ));
    card.push_str(&format!(
        "<p class=\"key\">정답: {}</p>\n",
        html_escape(w.correct_answer_or_marker())
    ));
    if let Some(expl) = w.explanation.as_deref().filter(|e| !e.is_empty()) {
        card.push_str(&format!("<p class=\"expl\">해설: {}</p>\n", html_escape(expl)));
    }

    push_block(&mut card, "문제", Some(&item.question));
    push_block(&mut card, "예제/자료", item.example.as_deref());
    push_block(&mut card, "표", item.table.as_deref());

    let choices = w.choices();
    if !choices.is_empty() {
        let key = w.correct_answer.as_deref().map(str::trim);
        let mine = w.user_answer.as_deref().map(str::trim);
        card.push_str("<ol class=\"choices\">\n");
        for choice in &choices {
            let number = choice.answer();
            let mut classes = Vec::new();
            if key == Some(number.as_str()) {
                classes.push("correct");
            }
            if mine == Some(number.as_str()) {
                classes.push("picked");
            }
            card.push_str(&format!(
                "<li class=\"{}\" value=\"{}\">{}</li>\n",
                classes.join(" "),
                choice.number,
                html_escape(&choice.text)
            ));
        }
        card.push_str("</ol>\n");
    }

    card.push_str("</article>\n");
    card
}

fn push_block(card: &mut String, title: &str, body: Option<&str>) {
    if let Some(body) = body.map(str::trim).filter(|b| !b.is_empty()) {
        card.push_str(&format!(
            "<div class=\"block\"><h4>{title}</h4><pre>{}</pre></div>\n",
            html_escape(body)
        ));
    }
}

/// Write the review page to a file.
pub fn write_html_report(report: &GradeReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_bar_chart(per_round: &[RoundTally]) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 140;

    let total_height = per_round.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, tally) in per_round.iter().enumerate() {
        let score = tally.accuracy();
        let y = i * (bar_height + padding) + padding;
        let width = (score * max_width as f64) as usize;

        let color = if score >= 0.8 {
            "#22c55e"
        } else if score >= 0.6 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&tally.round.label())
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
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans KR', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); max-width: 960px; }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-size: 1.5rem; font-weight: bold; }
.pct { color: #6b7280; font-weight: normal; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.card { border: 1px solid var(--border); border-radius: 8px; padding: 1rem 1.5rem; margin: 1rem 0; }
.card h3 { margin: 0 0 0.5rem; }
.round { color: #6b7280; font-size: 0.9rem; font-weight: normal; }
.mine { background: var(--fail); padding: 0.25rem 0.5rem; border-radius: 4px; }
.key { background: var(--pass); padding: 0.25rem 0.5rem; border-radius: 4px; }
.missing { font-style: italic; }
.block h4 { margin: 1rem 0 0.25rem; }
.choices li.correct { font-weight: bold; background: var(--pass); }
.choices li.picked { text-decoration: underline; }
pre { white-space: pre-wrap; overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
