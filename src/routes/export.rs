use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::FlashMessage;

use crate::forms::main::IndexQuery;
use crate::routes::redirect;
use crate::services::export::{ExportFormat, export_contacts};
use crate::services::main::DashboardState;

fn download(query: &IndexQuery, state: &DashboardState, format: ExportFormat) -> HttpResponse {
    let result = export_contacts(
        &state.exports,
        state.store.read().records(),
        &query.view_state(),
        format,
    );

    match result {
        Ok(file) => HttpResponse::Ok()
            .content_type(format.content_type())
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(format.file_name().to_string())],
            })
            .body(file.bytes),
        Err(err) => {
            log::error!("Failed to export contacts: {err}");
            FlashMessage::error(err.to_string()).send();
            redirect(&query.index_location())
        }
    }
}

#[get("/contacts/export.csv")]
pub async fn export_csv(
    query: web::Query<IndexQuery>,
    state: web::Data<DashboardState>,
) -> impl Responder {
    download(&query, &state, ExportFormat::Csv)
}

#[get("/contacts/export.pdf")]
pub async fn export_pdf(
    query: web::Query<IndexQuery>,
    state: web::Data<DashboardState>,
) -> impl Responder {
    download(&query, &state, ExportFormat::Pdf)
}
