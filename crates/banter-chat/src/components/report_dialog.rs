//! Content report modal.

use banter_client::{ReportDraft, ReportReason};
use dioxus::prelude::*;

use crate::state::ChatContext;

/// Report dialog component.
///
/// Mounted while `ChatContext::report_target` is set; drafts are
/// validated locally and an invalid draft never reaches the store.
#[component]
pub fn ReportDialog() -> Element {
    let mut ctx = use_context::<ChatContext>();
    let mut reason = use_signal(|| ReportReason::Spam);
    let mut description = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let Some(target) = ctx.report_target.read().clone() else {
        return rsx! {};
    };
    let store = ctx.store.read().clone();

    let heading = if target.message_id.is_some() {
        "Report message"
    } else {
        "Report conversation"
    };
    let description_hint = if reason.read().requires_description() {
        "Tell us what happened (required)"
    } else {
        "Tell us what happened (optional)"
    };

    rsx! {
        div { class: "report-overlay",
            div { class: "report-modal",
                div { class: "report-header",
                    h3 { "{heading}" }
                    button {
                        class: "close-button",
                        onclick: move |_| ctx.report_target.set(None),
                        "✕"
                    }
                }

                div { class: "report-section",
                    h4 { "Reason" }
                    select {
                        class: "report-reason",
                        disabled: *submitting.read(),
                        onchange: move |evt| {
                            if let Some(r) = ReportReason::parse(&evt.value()) {
                                reason.set(r);
                                error.set(None);
                            }
                        },
                        for r in ReportReason::ALL {
                            {
                                let value = r.as_str();
                                let label = r.label();
                                let selected = *reason.read() == r;
                                rsx! {
                                    option { key: "{value}", value: "{value}", selected: selected, "{label}" }
                                }
                            }
                        }
                    }
                }

                div { class: "report-section",
                    h4 { "Description" }
                    textarea {
                        class: "report-description",
                        placeholder: "{description_hint}",
                        disabled: *submitting.read(),
                        value: "{description}",
                        oninput: move |evt| {
                            description.set(evt.value());
                            error.set(None);
                        },
                    }
                }

                if let Some(ref err) = *error.read() {
                    div { class: "report-error", "{err}" }
                }

                div { class: "report-buttons",
                    button {
                        class: "report-cancel",
                        disabled: *submitting.read(),
                        onclick: move |_| ctx.report_target.set(None),
                        "Cancel"
                    }
                    button {
                        class: "report-submit",
                        disabled: *submitting.read(),
                        onclick: move |_| {
                            if *submitting.read() {
                                return;
                            }
                            let draft = ReportDraft {
                                conversation_id: target.conversation_id.clone(),
                                reason: *reason.read(),
                                description: description.read().clone(),
                                message_id: target.message_id.clone(),
                            };
                            if let Err(err) = draft.validate() {
                                error.set(Some(err.to_string()));
                                return;
                            }
                            error.set(None);
                            submitting.set(true);
                            let store = store.clone();
                            spawn(async move {
                                let result = store.0
                                    .report_conversation(
                                        &draft.conversation_id,
                                        draft.reason,
                                        draft.description.trim(),
                                        draft.message_id.clone(),
                                    )
                                    .await;
                                match result {
                                    Ok(()) => ctx.report_target.set(None),
                                    Err(err) => {
                                        error.set(Some(format!("Could not submit report: {err}")));
                                        submitting.set(false);
                                    }
                                }
                            });
                        },
                        if *submitting.read() { "Submitting..." } else { "Submit report" }
                    }
                }
            }
        }
    }
}
