//! Interactive credential prompting.
//!
//! Fills whatever the config chain could not resolve: username with a
//! visible prompt, password hidden. Without a terminal on stdin nothing is
//! prompted and missing credentials are an error.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::SecretString;

use netinv_config::{Config, resolve_credentials};
use netinv_core::{ControllerCredentials, ControllerTarget, CoreError, CredentialProvider};

pub struct PromptCredentials<'a> {
    config: &'a Config,
    interactive: bool,
}

impl<'a> PromptCredentials<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            interactive: std::io::stdin().is_terminal(),
        }
    }

    fn missing(target: &ControllerTarget, what: &str) -> CoreError {
        CoreError::Credentials {
            target: target.to_string(),
            reason: format!("no {what} configured and stdin is not a terminal"),
        }
    }
}

impl CredentialProvider for PromptCredentials<'_> {
    fn credentials(&self, target: &ControllerTarget) -> Result<ControllerCredentials, CoreError> {
        let partial = resolve_credentials(self.config, target);

        let username = match partial.username {
            Some(username) => username,
            None if self.interactive => Input::<String>::new()
                .with_prompt(format!("Username for {target}"))
                .interact_text()
                .map_err(|e| CoreError::Credentials {
                    target: target.to_string(),
                    reason: e.to_string(),
                })?,
            None => return Err(Self::missing(target, "username")),
        };

        let password = match partial.password {
            Some(password) => password,
            None if self.interactive => {
                rpassword::prompt_password(format!("Password for {username}@{}: ", target.address))
                    .map(SecretString::from)
                    .map_err(|e| CoreError::Credentials {
                        target: target.to_string(),
                        reason: e.to_string(),
                    })?
            }
            None => return Err(Self::missing(target, "password")),
        };

        Ok(ControllerCredentials { username, password })
    }
}
