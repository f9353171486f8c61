//! Pure projection transition planning.
//!
//! Every function mutates the local projector record in place and returns
//! the request that persists the new state, or `None` when the intent is
//! a no-op. `None` means the record was left untouched and nothing must be
//! sent. The caller issues exactly one request per `Some`.

use rostra_data::{Projector, ProjectorElement};

use crate::client::ProjectRequest;

/// Put an element on the live projection.
///
/// Stable elements merge idempotently; projecting one that is already
/// shown changes nothing. A non-stable element evicts every other
/// non-stable element, and the evicted set becomes a new history frame,
/// mirrored on the local record so navigation keeps working between
/// server syncs and appended server-side through the request.
pub fn plan_project(projector: &mut Projector, element: ProjectorElement) -> Option<ProjectRequest> {
    if element.stable {
        if projector.is_element_shown(&element) {
            return None;
        }
        projector.add_element(element);
        Some(ProjectRequest {
            elements: Some(projector.elements.clone()),
            ..Default::default()
        })
    } else {
        let removed = projector.remove_non_stable();
        projector.add_element(element);
        push_history_frame(projector, &removed);
        Some(ProjectRequest {
            elements: Some(projector.elements.clone()),
            append_to_history: non_empty(removed),
            ..Default::default()
        })
    }
}

/// Take an element off the live projection.
///
/// Stable elements are removed individually. Removing a non-stable
/// element clears the whole non-stable set as a batch and pushes it to
/// the history. Either way, nothing removed means nothing persisted.
pub fn plan_remove(projector: &mut Projector, element: &ProjectorElement) -> Option<ProjectRequest> {
    if element.stable {
        let removed = projector.remove_matching(element);
        if removed.is_empty() {
            return None;
        }
        Some(ProjectRequest {
            elements: Some(projector.elements.clone()),
            ..Default::default()
        })
    } else {
        let removed = projector.remove_non_stable();
        if removed.is_empty() {
            return None;
        }
        push_history_frame(projector, &removed);
        Some(ProjectRequest {
            elements: Some(projector.elements.clone()),
            append_to_history: Some(removed),
            ..Default::default()
        })
    }
}

/// Project the preview element at `index`, evicting the current
/// non-stable elements into the history.
pub fn plan_preview_slide(projector: &mut Projector, index: usize) -> Option<ProjectRequest> {
    if index >= projector.elements_preview.len() {
        return None;
    }
    let removed = projector.remove_non_stable();
    let element = projector.elements_preview.remove(index);
    projector.add_element(element);
    push_history_frame(projector, &removed);
    Some(ProjectRequest {
        elements: Some(projector.elements.clone()),
        preview: Some(projector.elements_preview.clone()),
        append_to_history: non_empty(removed),
        ..Default::default()
    })
}

/// Recall the most recent history frame.
///
/// The frame's first element (if any) goes live again, the current
/// non-stable elements move to the front of the preview queue in order,
/// and the server is told to drop its own last history entry: this
/// transition consumes history rather than producing it.
pub fn plan_previous_slide(projector: &mut Projector) -> Option<ProjectRequest> {
    let frame = projector.elements_history.pop()?;
    let recalled = frame.into_iter().next();

    let removed = projector.remove_non_stable();
    for (position, element) in removed.into_iter().enumerate() {
        projector.elements_preview.insert(position, element);
    }

    if let Some(element) = recalled {
        projector.add_element(element);
    }

    Some(ProjectRequest {
        elements: Some(projector.elements.clone()),
        preview: Some(projector.elements_preview.clone()),
        delete_last_history_element: Some(true),
        ..Default::default()
    })
}

/// Persist the preview queue unchanged, after local reordering.
pub fn plan_save_preview(projector: &Projector) -> ProjectRequest {
    ProjectRequest {
        preview: Some(projector.elements_preview.clone()),
        ..Default::default()
    }
}

/// Append an element to the preview queue.
pub fn plan_queue_element(
    projector: &mut Projector,
    element: ProjectorElement,
) -> ProjectRequest {
    projector.elements_preview.push(element);
    ProjectRequest {
        preview: Some(projector.elements_preview.clone()),
        ..Default::default()
    }
}

fn non_empty(elements: Vec<ProjectorElement>) -> Option<Vec<ProjectorElement>> {
    if elements.is_empty() {
        None
    } else {
        Some(elements)
    }
}

/// Mirror a server-side history append on the local record. Empty
/// eviction sets never become a frame.
fn push_history_frame(projector: &mut Projector, removed: &[ProjectorElement]) {
    if !removed.is_empty() {
        projector.elements_history.push(removed.to_vec());
    }
}
