//! Extractors for who is acting and where the request came from.
//!
//! [`Caller`] resolves to the configured administrator until authentication
//! exists. [`RequestOrigin`] captures the peer address and `User-Agent` for
//! the audit trail.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};

use crate::domain::{AuditContext, Error, RequestOrigin, UserId};
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(UserId);

impl Caller {
    pub fn user_id(self) -> UserId {
        self.0
    }

    /// Pair the caller with the request origin for an audited mutation.
    pub fn audit(self, origin: RequestOrigin) -> AuditContext {
        AuditContext::new(self.0, origin)
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let caller = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| Caller(state.caller))
            .ok_or_else(|| Error::internal("caller identity is not configured"));
        ready(caller)
    }
}

impl FromRequest for RequestOrigin {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let ip_address = req.peer_addr().map(|addr| addr.ip().to_string());
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        ready(Ok(RequestOrigin::new(ip_address, user_agent)))
    }
}
