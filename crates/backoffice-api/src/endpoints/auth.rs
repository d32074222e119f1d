// Auth endpoint (`/api/v1/auth/login`)
//
// A successful login stores the returned token on the client, so every
// later request carries `Authorization: Bearer <token>`.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{AuthUserDto, Envelope, LoginedUserVo};

impl ApiClient {
    /// Authenticate and store the bearer token.
    ///
    /// `POST /auth/login`
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Envelope<LoginedUserVo>, Error> {
        debug!(username, "logging in");

        let body = AuthUserDto {
            username: username.to_owned(),
            password: password.expose_secret().to_owned(),
        };

        let envelope: Envelope<LoginedUserVo> =
            self.post("auth/login", &body).await.map_err(|e| match e {
                Error::Api { message, .. } => Error::Authentication { message },
                other => other,
            })?;

        match envelope.data.as_ref() {
            Some(user) if !user.token.is_empty() => {
                self.set_token(SecretString::from(user.token.clone()));
            }
            _ => {
                return Err(Error::Authentication {
                    message: if envelope.message.is_empty() {
                        "login response carried no token".into()
                    } else {
                        envelope.message
                    },
                });
            }
        }

        Ok(envelope)
    }
}
