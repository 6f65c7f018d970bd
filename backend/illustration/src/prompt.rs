//! Prompt composition for the summary illustration.

use cardforge_core::{CardContext, CardRecord};

/// Build the image-generation prompt from a card and its freshly
/// submitted context.
pub fn summary_prompt(record: &CardRecord, context: &CardContext) -> String {
    let full_name = record.full_name();
    let name = non_empty(&full_name, "this contact");
    let company = non_empty(&record.company, "an unknown company");
    let phone = non_empty(&record.phone, "n/a");
    let email = non_empty(&record.email, "n/a");

    format!(
        "Create a friendly, professional portrait for {name} who works at {company}. \
         Highlight cues from the business card: phone {phone}, email {email}. \
         Meeting context: {}. Priorities: {}. Personal details: {}. \
         Style: clean, corporate-ready, subtle background with company color hints, \
         photographic realism.",
        context.meeting_context, context.priorities, context.personal_notes,
    )
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}
