use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::info;
use validator::Validate;

use crate::error::AppError;
use crate::models::contact_messages;
use crate::models::dto::{ContactRequest, MessageResponse};

/// POST /contact - Formulaire de contact (PUBLIC)
#[post("")]
pub async fn submit(
    body: web::Json<ContactRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let request = body.into_inner();

    let saved = contact_messages::ActiveModel {
        name: Set(request.name.trim().to_string()),
        email: Set(request.email.trim().to_lowercase()),
        subject: Set(request.subject),
        message: Set(request.message),
        is_read: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db.get_ref())
    .await?;

    info!(message_id = saved.id, "contact message received");
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Message sent successfully!")))
}

pub fn contact_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/contact").service(submit));
}
