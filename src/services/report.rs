// src/services/report.rs

//! Alert email bodies.

use std::fmt::Write as _;

use crate::models::{ExpiringRecord, Field};
use crate::utils::or_dash;

/// Subject line of every alert.
pub const SUBJECT: &str = "⚠️ Upcoming Stock Expiry Alert: Action Required";

const GREETING: &str = "Hi Bar Manager,";
const REVIEW_NOTE: &str = "Please review the details below and take appropriate action (e.g., priority sale, removal, or replacement).";
const SUGGESTED_ACTION: &str = "Move these products to the front shelf for quicker sale";

const STYLE: &str = "body{font-family:Arial,sans-serif;line-height:1.6;color:#333}\
.container{max-width:800px;margin:0 auto;padding:20px}\
table{width:100%;border-collapse:collapse;margin:20px 0}\
th{background-color:#f2f2f2;font-weight:bold;border:1px solid #ddd;padding:8px;text-align:left}\
td{border:1px solid #ddd;padding:8px}\
.alert{background-color:#fff3cd;border-left:4px solid #ffc107;padding:15px;margin:20px 0}";

fn window_sentence(days: u32) -> String {
    format!(
        "This is an automated reminder that the following stock item(s) in your inventory are approaching expiry within {} day{}.",
        days,
        if days == 1 { "" } else { "s" }
    )
}

/// Plain-text alert body.
pub fn render_text(records: &[ExpiringRecord], days: u32) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}\n", SUBJECT);
    let _ = writeln!(text, "{}\n", GREETING);
    let _ = writeln!(text, "{}", window_sentence(days));
    let _ = writeln!(text, "{}\n", REVIEW_NOTE);
    let _ = writeln!(text, "📦 Stock Details\n");

    let titles: Vec<&str> = Field::ALL.iter().map(|f| f.title()).collect();
    let _ = writeln!(text, "{}", titles.join("\t"));
    for record in records {
        let cells: Vec<&str> = Field::ALL
            .iter()
            .map(|f| or_dash(record.value(*f)))
            .collect();
        let _ = writeln!(text, "{}", cells.join("\t"));
    }

    let _ = writeln!(text, "\n🕒 Suggested Action");
    let _ = writeln!(text, "{}\n", SUGGESTED_ACTION);
    text.push_str("Regards,\nInventory Monitoring System\n");
    text
}

/// HTML alert body.
pub fn render_html(records: &[ExpiringRecord], days: u32) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><style>{}</style></head><body><div class=\"container\">",
        STYLE
    );
    let _ = write!(html, "<h2>{}</h2>", escape_html(SUBJECT));
    let _ = write!(html, "<p>{}</p>", GREETING);
    let _ = write!(html, "<p>{}</p>", window_sentence(days));
    let _ = write!(html, "<p>{}</p>", REVIEW_NOTE);

    html.push_str("<h3>📦 Stock Details</h3><table><thead><tr>");
    for field in Field::ALL {
        let _ = write!(html, "<th>{}</th>", escape_html(field.title()));
    }
    html.push_str("</tr></thead><tbody>");

    for record in records {
        html.push_str("<tr>");
        for field in Field::ALL {
            let _ = write!(html, "<td>{}</td>", escape_html(or_dash(record.value(field))));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    let _ = write!(
        html,
        "<div class=\"alert\"><strong>🕒 Suggested Action</strong><br>{}</div>",
        SUGGESTED_ACTION
    );
    html.push_str("<p>Regards,<br><strong>Inventory Monitoring System</strong></p>");
    html.push_str("</div></body></html>");
    html
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
