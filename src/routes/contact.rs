use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use reqwest::Url;
use tera::Tera;

use crate::domain::contact::ContactPatch;
use crate::domain::types::ContactId;
use crate::forms::contact::{EditContactForm, StatusForm};
use crate::forms::main::{IndexQuery, ReturnForm};
use crate::repository::HttpRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::delete_gate::{
    DELETE_FAILED, DeleteOutcome, confirm_delete as confirm_gate, request_delete,
};
use crate::services::main::{DashboardState, ensure_editing, load_delete_page, open_edit_dialog};
use crate::services::mutations::{UPDATE_FAILED, update_record, update_status};

fn index_location(return_query: &str) -> String {
    IndexQuery::from_return_query(return_query).index_location()
}

fn with_return_query(path: &str, return_query: &str) -> String {
    format!(
        "{path}?{}",
        serde_html_form::to_string(vec![("return_query", return_query)]).unwrap_or_default()
    )
}

/// `/contact/{id}/{action}` with the id kept as one encoded segment.
fn contact_path(id: &ContactId, action: &str) -> String {
    let Ok(mut url) = Url::parse("http://dashboard/contact") else {
        return "/".to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(id.as_str()).push(action);
    }
    url.path().to_string()
}

fn edit_location(id: &ContactId, return_query: &str) -> String {
    with_return_query(&contact_path(id, "edit"), return_query)
}

/// Flash text for a failed service call.
fn failure_message(err: &ServiceError, fallback: &str) -> String {
    match err {
        ServiceError::Repository(err) => err.user_message(fallback),
        ServiceError::NotFound | ServiceError::TypeConstraint(_) => {
            "Contact not found.".to_string()
        }
        other => other.to_string(),
    }
}

#[post("/contact/{id}/status")]
pub async fn update_contact_status(
    id: web::Path<String>,
    repo: web::Data<HttpRepository>,
    state: web::Data<DashboardState>,
    web::Form(form): web::Form<StatusForm>,
) -> impl Responder {
    let location = index_location(&form.return_query);

    let Ok(id) = ContactId::new(id.into_inner()) else {
        FlashMessage::error("Contact not found.").send();
        return redirect(&location);
    };

    let status = match form.status() {
        Ok(status) => status,
        Err(err) => {
            log::error!("Failed to validate status form: {err}");
            FlashMessage::error("Invalid status.").send();
            return redirect(&location);
        }
    };

    match update_status(repo.get_ref(), &state.store, &id, status).await {
        Ok(()) => FlashMessage::success("Contact status updated.").send(),
        Err(err @ ServiceError::NotFound) => {
            FlashMessage::error(failure_message(&err, UPDATE_FAILED)).send()
        }
        // Shown through the store's message slot.
        Err(_) => {}
    }

    redirect(&location)
}

#[get("/contact/{id}/edit")]
pub async fn show_edit_contact(
    id: web::Path<String>,
    query: web::Query<ReturnForm>,
    state: web::Data<DashboardState>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let return_query = query.into_inner().return_query;

    let data = match ContactId::new(id.into_inner())
        .map_err(ServiceError::from)
        .and_then(|id| open_edit_dialog(&state, &id, return_query.clone()))
    {
        Ok(data) => data,
        Err(err) => {
            log::error!("Failed to open edit dialog: {err}");
            FlashMessage::error(failure_message(&err, UPDATE_FAILED)).send();
            return redirect(&index_location(&return_query));
        }
    };

    let mut context = base_context(&flash_messages, "index");
    context.insert("page", &data);

    render_template(&tera, "contact/edit.html", &context)
}

#[post("/contact/{id}/edit")]
pub async fn save_contact(
    id: web::Path<String>,
    repo: web::Data<HttpRepository>,
    state: web::Data<DashboardState>,
    web::Form(form): web::Form<EditContactForm>,
) -> impl Responder {
    let return_query = form.return_query.clone();

    let id = match ContactId::new(id.into_inner()) {
        Ok(id) => id,
        Err(err) => {
            log::error!("Invalid contact id: {err}");
            FlashMessage::error("Contact not found.").send();
            return redirect(&index_location(&return_query));
        }
    };

    if let Err(err) = ensure_editing(&state, &id) {
        log::warn!("Rejected edit of contact {id}: {err}");
        FlashMessage::error(err.to_string()).send();
        return redirect(&index_location(&return_query));
    }

    let patch = match ContactPatch::try_from(form) {
        Ok(patch) => patch,
        Err(err) => {
            log::error!("Failed to validate edit form: {err}");
            FlashMessage::error("Please check the form values.").send();
            return redirect(&edit_location(&id, &return_query));
        }
    };

    match update_record(repo.get_ref(), &state.store, &state.editor, patch).await {
        Ok(_) => {
            FlashMessage::success("Contact updated.").send();
            redirect(&index_location(&return_query))
        }
        Err(err) => {
            FlashMessage::error(failure_message(&err, UPDATE_FAILED)).send();
            redirect(&edit_location(&id, &return_query))
        }
    }
}

#[post("/contact/edit/cancel")]
pub async fn cancel_edit_contact(
    state: web::Data<DashboardState>,
    web::Form(form): web::Form<ReturnForm>,
) -> impl Responder {
    state.editor.close();
    redirect(&index_location(&form.return_query))
}

#[post("/contact/{id}/delete")]
pub async fn request_delete_contact(
    id: web::Path<String>,
    state: web::Data<DashboardState>,
    web::Form(form): web::Form<ReturnForm>,
) -> impl Responder {
    let requested = ContactId::new(id.into_inner())
        .map_err(ServiceError::from)
        .and_then(|id| request_delete(&state.store, &state.gate, &id));
    if let Err(err) = requested {
        log::error!("Failed to start delete: {err}");
        FlashMessage::error(failure_message(&err, DELETE_FAILED)).send();
        return redirect(&index_location(&form.return_query));
    }

    redirect(&with_return_query("/contact/delete", &form.return_query))
}

/// Confirmation prompt for the contact held by the delete gate. Rendering it
/// never changes the gate.
#[get("/contact/delete")]
pub async fn show_delete_contact(
    query: web::Query<ReturnForm>,
    state: web::Data<DashboardState>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let return_query = query.into_inner().return_query;

    let Some(data) = load_delete_page(&state, return_query.clone()) else {
        return redirect(&index_location(&return_query));
    };

    let mut context = base_context(&flash_messages, "index");
    context.insert("page", &data);

    render_template(&tera, "contact/delete.html", &context)
}

#[post("/contact/delete/confirm")]
pub async fn confirm_delete_contact(
    repo: web::Data<HttpRepository>,
    state: web::Data<DashboardState>,
    web::Form(form): web::Form<ReturnForm>,
) -> impl Responder {
    // Failures are shown through the store's message slot.
    if let Ok(DeleteOutcome::Deleted(record)) =
        confirm_gate(repo.get_ref(), &state.store, &state.gate).await
    {
        FlashMessage::success(format!("Contact {} deleted.", record.name)).send();
    }

    redirect(&index_location(&form.return_query))
}

#[post("/contact/delete/cancel")]
pub async fn cancel_delete_contact(
    state: web::Data<DashboardState>,
    web::Form(form): web::Form<ReturnForm>,
) -> impl Responder {
    if !state.gate.cancel() {
        log::debug!("Delete cancel ignored in state {:?}", state.gate.state());
    }

    redirect(&index_location(&form.return_query))
}
