pub mod auth;
pub mod blog;
pub mod contact;
pub mod health;
pub mod leaderboard;
pub mod matches;
pub mod teams;
pub mod user;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(user::user_routes)
            .configure(matches::matches_routes)
            .configure(teams::teams_routes)
            .configure(leaderboard::leaderboard_routes)
            .configure(blog::blog_routes)
            .configure(contact::contact_routes)
    );
}
