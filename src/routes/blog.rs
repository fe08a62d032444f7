use actix_web::{get, web, HttpResponse};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::error::AppError;
use crate::models::blog_posts;

/// GET /blog - Articles publiés, les plus récents d'abord
#[get("")]
pub async fn list(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let posts = blog_posts::Entity::find()
        .filter(blog_posts::Column::IsPublished.eq(true))
        .order_by_desc(blog_posts::Column::PublishedAt)
        .all(db.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /blog/{slug} - Un article publié
#[get("/{slug}")]
pub async fn get_by_slug(
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let post = blog_posts::Entity::find()
        .filter(blog_posts::Column::Slug.eq(path.as_str()))
        .filter(blog_posts::Column::IsPublished.eq(true))
        .one(db.get_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Blog post not found"))?;

    Ok(HttpResponse::Ok().json(post))
}

pub fn blog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blog")
            .service(list)
            .service(get_by_slug),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use actix_web::{http::StatusCode, test, App};
    use chrono::{Duration, Utc};
    use sea_orm::{ActiveModelTrait, Set};
    use serde_json::Value;

    async fn seed_post(db: &DatabaseConnection, slug: &str, published: bool, days_ago: i64) {
        let now = Utc::now().naive_utc();
        blog_posts::ActiveModel {
            title: Set(format!("Post {slug}")),
            slug: Set(slug.to_string()),
            excerpt: Set(None),
            content: Set("Captaincy picks for the weekend.".to_string()),
            image_url: Set(None),
            author_id: Set(1),
            is_published: Set(published),
            published_at: Set(published.then(|| now - Duration::days(days_ago))),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[actix_web::test]
    async fn test_only_published_posts_are_visible() {
        let db = test_support::memory_db().await;
        seed_post(&db, "older", true, 5).await;
        seed_post(&db, "newer", true, 1).await;
        seed_post(&db, "draft", false, 0).await;

        let app = test::init_service(App::new().app_data(web::Data::new(db)).configure(blog_routes)).await;

        let req = test::TestRequest::get().uri("/blog").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let slugs: Vec<&str> = body.as_array().unwrap().iter().map(|p| p["slug"].as_str().unwrap()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);

        let req = test::TestRequest::get().uri("/blog/draft").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/blog/older").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["title"], "Post older");
    }
}
