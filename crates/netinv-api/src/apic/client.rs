// APIC HTTP client
//
// Wraps `reqwest::Client` with APIC URL construction, `imdata` envelope
// parsing, and the `APIC-cookie` session token.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::cookie::Jar;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, trace};
use url::Url;

use crate::apic::models::{
    AaaLoginObject, FabricNode, FabricNodeObject, FirmwareRunningObject, ImData, NodeFirmware,
};
use crate::error::Error;
use crate::transport::{TransportConfig, join_path};

/// Cookie name the controller expects the session token under.
pub const TOKEN_COOKIE: &str = "APIC-cookie";

/// HTTP client for a fabric controller's REST API.
///
/// After [`login`](Self::login) the session token lives in the client's
/// cookie jar and rides along on every subsequent request.
pub struct ApicClient {
    http: reqwest::Client,
    base_url: Url,
    cookie_jar: Arc<Jar>,
}

impl ApicClient {
    /// Create a client for the controller at `base_url`.
    ///
    /// A cookie jar is created if the transport config doesn't carry one.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = transport.ensure_cookie_jar();
        let cookie_jar = config
            .cookie_jar
            .clone()
            .unwrap_or_else(|| Arc::new(Jar::default()));
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            cookie_jar,
        })
    }

    /// Authenticate and store the session token as the `APIC-cookie` cookie.
    ///
    /// `POST /api/aaaLogin.json` with `{"aaaUser":{"attributes":{"name","pwd"}}}`.
    /// Anything other than HTTP 200 is an authentication failure.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = join_path(&self.base_url, "/api/aaaLogin.json")?;
        debug!("logging in at {}", url);

        let body = json!({
            "aaaUser": {
                "attributes": {
                    "name": username,
                    "pwd": password.expose_secret(),
                }
            }
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
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

        let login: ImData<AaaLoginObject> = Self::read_json(resp).await?;
        let token = login
            .imdata
            .into_iter()
            .next()
            .map(|obj| obj.aaa_login.attributes.token)
            .ok_or_else(|| Error::Authentication {
                message: "login response carried no token".into(),
            })?;

        self.cookie_jar
            .add_cookie_str(&format!("{TOKEN_COOKIE}={token}"), &self.base_url);

        debug!("login successful");
        Ok(())
    }

    /// List every node registered in the fabric.
    ///
    /// `GET /api/node/class/fabricNode.json`. A non-200 answer is an error
    /// for the whole listing.
    pub async fn list_fabric_nodes(&self) -> Result<Vec<FabricNode>, Error> {
        let url = join_path(&self.base_url, "/api/node/class/fabricNode.json")?;
        let nodes: ImData<FabricNodeObject> = self.get(url).await?;
        Ok(nodes
            .imdata
            .into_iter()
            .map(|obj| obj.fabric_node.attributes)
            .collect())
    }

    /// Look up the running firmware of one node by its distinguished name.
    ///
    /// `GET /api/node/class/{dn}/firmwareRunning.json`. Returns
    /// [`NodeFirmware::Ambiguous`] when the controller reports a count other
    /// than `"1"`; a non-200 answer is an `Err`.
    pub async fn node_firmware(&self, node_dn: &str) -> Result<NodeFirmware, Error> {
        let url = join_path(
            &self.base_url,
            &format!("/api/node/class/{node_dn}/firmwareRunning.json"),
        )?;
        let firmware: ImData<FirmwareRunningObject> = self.get(url).await?;

        let total_count = firmware.total_count_text();
        if total_count.as_deref() != Some("1") {
            trace!(node_dn, ?total_count, "firmware count is not exactly one");
            return Ok(NodeFirmware::Ambiguous { total_count });
        }

        Ok(firmware.imdata.into_iter().next().map_or(
            NodeFirmware::Ambiguous { total_count },
            |obj| NodeFirmware::Running(obj.firmware_running.attributes.version),
        ))
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview,
            });
        }

        Self::read_json(resp).await
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, &body))
    }
}
