//! Authentication operations: login, logout, session checks.
//!
//! Session lifecycle: Anonymous -> Authenticated on a successful `login`,
//! back to Anonymous on `logout`. Reacting to an Unauthorized error from
//! any other call (e.g. by logging out) is caller policy, not enforced
//! here.

use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, Request};
use crate::error::{ApiError, ErrorKind};
use crate::http::HttpMethod;
use crate::session::{mask_token, SessionStore};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    senha: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

impl ApiClient {
    /// Authenticate and persist the returned session token. Any stale token
    /// is discarded before the attempt, so a failed login always leaves the
    /// session anonymous.
    ///
    /// A 401 keeps its kind but is reworded for login's callers, where it
    /// means bad credentials rather than an expired session.
    pub fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.session().clear()?;

        let request = Request::new(HttpMethod::Post, "/auth/login").json(&LoginRequest {
            email,
            senha: password,
        })?;
        let response: LoginResponse = self.execute(request).map_err(|err| {
            if err.kind == ErrorKind::Unauthorized {
                err.with_message("Invalid credentials; check your email and password.")
            } else {
                err
            }
        })?;

        self.session().save(&response.token)?;
        log::debug!("login succeeded ({})", mask_token(&response.token));
        Ok(())
    }

    /// End the session. The server-side logout is best-effort; the local
    /// token is cleared no matter how that call went, so logout can never
    /// leave a stale token behind. Only a storage failure propagates.
    pub fn logout(&self) -> Result<(), ApiError> {
        if let Err(err) = self.execute_unit(Request::new(HttpMethod::Post, "/auth/logout")) {
            log::warn!("server-side logout failed, clearing local session anyway: {err}");
        }
        self.session().clear()
    }

    /// Whether a session token is present locally. No network round-trip;
    /// the token may still be rejected by the server with a 401.
    pub fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.session().read()?.is_some())
    }

    /// Like `is_authenticated`, but confirms the token against the server
    /// with a lightweight authenticated probe. A rejected token yields
    /// `Ok(false)`; other failures (network, server) propagate.
    pub fn verify_session(&self) -> Result<bool, ApiError> {
        if self.session().read()?.is_none() {
            return Ok(false);
        }
        match self.get_profile() {
            Ok(_) => Ok(true),
            Err(err) if matches!(err.kind, ErrorKind::Unauthorized | ErrorKind::Forbidden) => {
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::http::{HttpMethod, TransportError};
    use crate::session::SessionStore;
    use crate::testing::client_with_fake;

    #[test]
    fn login_stores_returned_token() {
        let (client, session, transport) = client_with_fake();
        transport.respond(200, r#"{"token":"abc123"}"#);

        client.login("a@b.com", "secret").unwrap();

        assert_eq!(session.read().unwrap().as_deref(), Some("abc123"));
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert!(requests[0].url.ends_with("/auth/login"));
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "a@b.com");
        assert_eq!(body["senha"], "secret");
    }

    #[test]
    fn login_request_is_unauthenticated_even_with_stale_token() {
        let (client, session, transport) = client_with_fake();
        session.save("stale").unwrap();
        transport.respond(200, r#"{"token":"fresh"}"#);

        client.login("a@b.com", "secret").unwrap();

        let requests = transport.requests();
        assert!(requests[0]
            .headers
            .iter()
            .all(|(name, _)| name != "authorization"));
        assert_eq!(session.read().unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn failed_login_rewords_unauthorized_keeping_kind() {
        let (client, session, transport) = client_with_fake();
        transport.respond(401, "");

        let err = client.login("a@b.com", "wrong").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(
            err.message,
            "Invalid credentials; check your email and password."
        );
        assert_eq!(session.read().unwrap(), None);
    }

    #[test]
    fn failed_login_leaves_session_anonymous() {
        let (client, session, transport) = client_with_fake();
        session.save("stale").unwrap();
        transport.fail(TransportError::Connection("refused".to_string()));

        let err = client.login("a@b.com", "secret").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(session.read().unwrap(), None);
    }

    #[test]
    fn logout_clears_token_on_success() {
        let (client, session, transport) = client_with_fake();
        session.save("abc123").unwrap();
        transport.respond(204, "");

        client.logout().unwrap();
        assert_eq!(session.read().unwrap(), None);
    }

    #[test]
    fn logout_clears_token_despite_network_failure() {
        let (client, session, transport) = client_with_fake();
        session.save("abc123").unwrap();
        transport.fail(TransportError::Connection("server unreachable".to_string()));

        client.logout().unwrap();
        assert_eq!(session.read().unwrap(), None);
    }

    #[test]
    fn logout_clears_token_despite_server_rejection() {
        let (client, session, transport) = client_with_fake();
        session.save("abc123").unwrap();
        transport.respond(500, "");

        client.logout().unwrap();
        assert_eq!(session.read().unwrap(), None);
    }

    #[test]
    fn is_authenticated_reflects_token_presence() {
        let (client, session, _transport) = client_with_fake();
        assert!(!client.is_authenticated().unwrap());
        session.save("abc123").unwrap();
        assert!(client.is_authenticated().unwrap());
        session.clear().unwrap();
        assert!(!client.is_authenticated().unwrap());
    }

    #[test]
    fn verify_session_without_token_skips_network() {
        let (client, _session, transport) = client_with_fake();
        assert!(!client.verify_session().unwrap());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn verify_session_accepts_live_token() {
        let (client, session, transport) = client_with_fake();
        session.save("abc123").unwrap();
        transport.respond(
            200,
            r#"{"id":1,"nome":"Ana","email":"a@b.com","dataCriacao":"2024-01-01","ativo":true,"roles":[]}"#,
        );
        assert!(client.verify_session().unwrap());
    }

    #[test]
    fn verify_session_treats_rejection_as_false() {
        let (client, session, transport) = client_with_fake();
        session.save("expired").unwrap();
        transport.respond(401, "");
        assert!(!client.verify_session().unwrap());
    }

    #[test]
    fn verify_session_propagates_other_failures() {
        let (client, session, transport) = client_with_fake();
        session.save("abc123").unwrap();
        transport.respond(500, "");
        let err = client.verify_session().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Server);
    }
}
