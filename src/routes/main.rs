use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::main::{IndexQuery, ReturnForm};
use crate::repository::HttpRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::main::{DashboardState, load_index_page};
use crate::services::store::refresh;

#[get("/")]
pub async fn show_index(
    query: web::Query<IndexQuery>,
    repo: web::Data<HttpRepository>,
    state: web::Data<DashboardState>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match load_index_page(repo.get_ref(), &state, &query).await {
        Ok(data) => data,
        Err(err) => {
            log::error!("Failed to load contacts page: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, "index");
    context.insert("page", &data);

    render_template(&tera, "main/index.html", &context)
}

#[post("/contacts/refresh")]
pub async fn refresh_contacts(
    repo: web::Data<HttpRepository>,
    state: web::Data<DashboardState>,
    web::Form(form): web::Form<ReturnForm>,
) -> impl Responder {
    // Errors land in the store's message slot shown above the table.
    if refresh(repo.get_ref(), &state.store).await.is_ok() {
        FlashMessage::info("Contacts refreshed.").send();
    }

    redirect(&IndexQuery::from_return_query(&form.return_query).index_location())
}
