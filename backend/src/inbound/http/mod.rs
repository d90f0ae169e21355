//! HTTP inbound adapter exposing the JSON API.
//!
//! [`configure`] registers every resource together with the extractor
//! configs that turn malformed JSON, paths and queries into the standard
//! error envelope. Health endpoints are registered by the server since they
//! read a separate [`health::HealthState`].

pub mod audit;
pub mod cors;
pub mod error;
pub mod health;
pub mod message;
pub mod origin;
pub mod questions;
pub mod roles;
pub mod schemas;
pub mod state;
pub mod template_access;
pub mod template_questions;
pub mod templates;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;
use error::extractor_rejection;

/// Register extractor configs and every API resource on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| extractor_rejection("json", err)))
        .app_data(
            web::QueryConfig::default().error_handler(|err, _| extractor_rejection("query", err)),
        )
        .app_data(
            web::PathConfig::default().error_handler(|err, _| extractor_rejection("path", err)),
        )
        .service(users::create_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(questions::add_question)
        .service(questions::create_question)
        .service(questions::list_questions)
        .service(questions::get_question)
        .service(questions::update_question)
        .service(questions::delete_question)
        .service(templates::create_template)
        .service(templates::list_templates)
        .service(templates::get_template)
        .service(templates::update_template)
        .service(templates::delete_template)
        .service(template_access::grant_access)
        .service(template_access::list_access)
        .service(template_access::revoke_access)
        .service(template_questions::replace_questions)
        .service(template_questions::list_questions)
        .service(template_questions::remove_question)
        .service(audit::create_entry)
        .service(audit::list_entries)
        .service(audit::get_entry)
        .service(roles::assign_role)
        .service(roles::list_roles)
        .service(roles::get_role);
}
