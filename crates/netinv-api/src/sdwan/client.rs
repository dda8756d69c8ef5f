// vManage HTTP client
//
// Session cookie from `j_security_check`, plus an XSRF token that must
// accompany every `/dataservice` request once fetched.

use std::sync::{PoisonError, RwLock};

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::sdwan::models::{DataEnvelope, SdwanDevice};
use crate::transport::{TransportConfig, join_path};

const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// HTTP client for an SD-WAN controller.
pub struct SdwanClient {
    http: reqwest::Client,
    base_url: Url,
    /// XSRF token from `/dataservice/client/token`. Older controllers don't
    /// issue one, in which case requests go out without the header.
    xsrf_token: RwLock<Option<String>>,
}

impl SdwanClient {
    /// Create a client for the controller at `base_url`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.ensure_cookie_jar().build_client()?;
        Ok(Self {
            http,
            base_url,
            xsrf_token: RwLock::new(None),
        })
    }

    /// Authenticate with username/password.
    ///
    /// `POST /j_security_check` as a form. The controller answers a bad
    /// login with HTTP 200 and its HTML login page, so an HTML body is a
    /// failure too. On success the XSRF token is fetched and stored.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = join_path(&self.base_url, "/j_security_check")?;
        debug!("logging in at {}", url);

        let form = [
            ("j_username", username),
            ("j_password", password.expose_secret()),
        ];

        let resp = self
            .http
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Authentication {
                message: format!("unable to reach controller: {e}"),
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if body.to_ascii_lowercase().contains("<html") {
            return Err(Error::Authentication {
                message: "controller returned its login page".into(),
            });
        }

        self.fetch_xsrf_token().await?;
        debug!("login successful");
        Ok(())
    }

    /// List every device the controller manages.
    ///
    /// `GET /dataservice/device`.
    pub async fn list_devices(&self) -> Result<Vec<SdwanDevice>, Error> {
        let url = join_path(&self.base_url, "/dataservice/device")?;
        let envelope: DataEnvelope<SdwanDevice> = self.get_json(url).await?;
        Ok(envelope.data)
    }

    /// End the session. Failures are reported but harmless.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = join_path(&self.base_url, "/logout")?;
        debug!("logging out at {}", url);
        let _resp = self
            .apply_xsrf(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        Ok(())
    }

    // ── XSRF token management ────────────────────────────────────────

    async fn fetch_xsrf_token(&self) -> Result<(), Error> {
        let url = join_path(&self.base_url, "/dataservice/client/token")?;
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        if resp.status() != StatusCode::OK {
            trace!(status = %resp.status(), "controller issued no XSRF token");
            return Ok(());
        }

        let token = resp.text().await.map_err(Error::Transport)?;
        let token = token.trim();
        if !token.is_empty() && !token.contains('<') {
            debug!("storing XSRF token");
            *self.xsrf_token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        }
        Ok(())
    }

    fn apply_xsrf(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.xsrf_token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_deref() {
            Some(token) => builder.header(XSRF_HEADER, token),
            None => builder,
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .apply_xsrf(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("session rejected (HTTP {status})"),
            });
        }
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, &body))
    }
}
