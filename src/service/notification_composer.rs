use crate::model::quote::{FormType, QuoteSubmission};
use crate::service::row_normalizer::{layout_for, resolve_cell, CellSource};
use crate::util::email::NotificationMessage;

pub fn subject_for(submission: &QuoteSubmission) -> String {
    let name = submission.name().unwrap_or_else(|| "Unknown".to_string());
    match submission.form_type() {
        FormType::Landscape => format!("New Landscape Quote Request from {}", name),
        FormType::Construction => format!("New Construction Quote Request from {}", name),
        FormType::General => format!("New Quote Request from {}", name),
    }
}

/// `(label, value)` pairs for the submission's layout, with fallbacks.
fn rendered_fields(submission: &QuoteSubmission) -> Vec<(&'static str, String)> {
    layout_for(submission.form_type())
        .iter()
        .filter(|spec| spec.source != CellSource::Timestamp)
        .map(|spec| {
            let value = resolve_cell(submission, spec.source)
                .unwrap_or_else(|| spec.fallback.to_string());
            (spec.label, value)
        })
        .collect()
}

fn heading(form_type: FormType) -> &'static str {
    match form_type {
        FormType::Landscape => "New Landscape Quote Request",
        FormType::Construction => "New Construction Quote Request",
        FormType::General => "New Quote Request",
    }
}

fn text_body(submission: &QuoteSubmission) -> String {
    let mut body = format!("{}\n\n", heading(submission.form_type()));
    for (label, value) in rendered_fields(submission) {
        body.push_str(&format!("{}: {}\n", label, value));
    }
    body.push_str(&format!("\nForm type: {}\n", submission.form_type().as_tag()));
    body
}

fn html_body(submission: &QuoteSubmission) -> String {
    let rows: String = rendered_fields(submission)
        .into_iter()
        .map(|(label, value)| {
            format!(
                "<tr><th align=\"left\">{}</th><td>{}</td></tr>",
                label,
                html_escape::encode_text(&value)
            )
        })
        .collect();

    format!(
        r#"<h2>{heading}</h2>
<table cellpadding="4">{rows}</table>
<h3>Submitted data</h3>
<pre>{dump}</pre>"#,
        heading = heading(submission.form_type()),
        rows = rows,
        dump = html_escape::encode_text(&submission.to_pretty_json()),
    )
}

/// Builds the notification for a new submission addressed to `recipient`.
pub fn compose_notification(submission: &QuoteSubmission, recipient: &str) -> NotificationMessage {
    let message = NotificationMessage::new(recipient.to_string(), subject_for(submission))
        .with_text_body(text_body(submission))
        .with_html_body(html_body(submission));

    match submission.email().filter(|e| e.contains('@')) {
        Some(email) => message.with_reply_to(email),
        None => message,
    }
}
