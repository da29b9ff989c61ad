//! Native file picking and the pending-attachment tray.

use banter_client::attachment::{AttachmentError, AttachmentPolicy, stage_file};
use banter_client::{AttachmentMeta, OutgoingAttachment};
use dioxus::prelude::*;
use thiserror::Error;

use crate::format::human_size;

/// Why a picker round produced no attachments.
/// Cancelling the dialog is not an error; it yields an empty batch.
#[derive(Debug, Error)]
pub enum PickError {
    /// The batch violated the attachment policy
    #[error(transparent)]
    Policy(#[from] AttachmentError),
    /// A selected file could not be read
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Open the native file dialog and stage the selection.
///
/// `staged` is how many files are already on the composer, so the
/// policy's count limit applies to the whole message. The batch is
/// accepted or rejected as a unit.
pub async fn pick_attachments(
    policy: &AttachmentPolicy,
    staged: usize,
) -> Result<Vec<OutgoingAttachment>, PickError> {
    let Some(files) = rfd::AsyncFileDialog::new()
        .set_title("Attach files")
        .pick_files()
        .await
    else {
        return Ok(Vec::new());
    };

    let mut picked = Vec::with_capacity(files.len());
    for file in &files {
        picked.push(stage_file(file.path())?);
    }

    let metas: Vec<AttachmentMeta> = picked.iter().map(|a| a.meta.clone()).collect();
    policy.validate(staged, &metas)?;

    Ok(picked)
}

/// Chips for files staged on the composer, each with a remove button.
#[component]
pub fn AttachmentTray(
    pending: Vec<OutgoingAttachment>,
    on_remove: EventHandler<usize>,
) -> Element {
    if pending.is_empty() {
        return rsx! {};
    }

    rsx! {
        div { class: "attachment-tray",
            for (index, attachment) in pending.iter().enumerate() {
                div { class: "attachment-chip pending", key: "{attachment.meta.name}-{index}",
                    span { class: "attachment-name", "📎 {attachment.meta.name}" }
                    span { class: "attachment-size", {human_size(attachment.meta.size)} }
                    button {
                        class: "attachment-remove",
                        title: "Remove",
                        onclick: move |_| on_remove.call(index),
                        "✕"
                    }
                }
            }
        }
    }
}
