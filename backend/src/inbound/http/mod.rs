//! HTTP inbound adapter exposing the JSON API.
//!
//! Every endpoint lives under `/api`; probes are mounted separately at the
//! root by the server binary.

pub mod auth;
pub mod dto;
pub mod enrollments;
pub mod error;
pub mod health;
pub mod programs;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

use error::{json_config, path_config, query_config};

/// Mount the `/api` scope.
///
/// Expects `web::Data<HttpState>` to be registered on the app.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use catalog_backend::inbound::http::{configure, state::HttpState};
///
/// fn build(state: HttpState) {
///     let _app = App::new()
///         .app_data(web::Data::new(state))
///         .configure(configure);
/// }
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .service(auth::register)
            .service(auth::login)
            .service(programs::list_programs)
            .service(programs::create_program)
            .service(programs::get_program)
            .service(programs::update_program)
            .service(programs::delete_program)
            .service(enrollments::enroll)
            .service(enrollments::unenroll)
            .service(enrollments::list_enrollees)
            .service(users::current_user)
            .service(users::current_user_programs)
            .service(users::list_users)
            .service(users::get_user)
            .service(users::update_user),
    );
}
