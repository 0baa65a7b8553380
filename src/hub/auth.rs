//! Authentication and session self-service endpoints.
//!
//! The backend owns the session: login sets the cookies, logout clears them.
//! This client only exchanges credentials and observes what comes back.

use color_eyre::{eyre::WrapErr, Result};

use super::api_types::{
  Acknowledgement, AuthResponse, Credentials, EmailChangeRequest, PasswordChangeRequest,
  RefreshResponse,
};
use super::transport::HubClient;

impl HubClient {
  pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
    let body = Credentials {
      email: email.to_string(),
      password: password.to_string(),
    };

    self
      .post_json("/auth/login", &body)
      .await
      .wrap_err("Failed to log in")
  }

  pub async fn signup(&self, email: &str, password: &str) -> Result<AuthResponse> {
    let body = Credentials {
      email: email.to_string(),
      password: password.to_string(),
    };

    self
      .post_json("/auth/signup", &body)
      .await
      .wrap_err("Failed to register")
  }

  /// Email-verification callback. This is the one bootstrap path that passes
  /// its token explicitly instead of relying on cookies.
  pub async fn verify_email(&self, token: &str) -> Result<AuthResponse> {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
      .append_pair("token", token)
      .finish();

    self
      .get_json_with_bearer(&format!("/auth/callback?{}", query), token)
      .await
      .wrap_err("Email verification failed")
  }

  pub async fn logout(&self) -> Result<()> {
    let _: Acknowledgement = self
      .post_empty("/auth/logout")
      .await
      .wrap_err("Failed to log out")?;
    Ok(())
  }

  pub async fn refresh_session(&self) -> Result<RefreshResponse> {
    self
      .post_empty("/auth/refresh")
      .await
      .wrap_err("Failed to refresh session")
  }

  pub async fn request_email_change(&self, new_email: &str, current_password: &str) -> Result<String> {
    let body = EmailChangeRequest {
      new_email: new_email.to_string(),
      current_password: current_password.to_string(),
    };

    let ack: Acknowledgement = self
      .post_json("/auth/request-email-change", &body)
      .await
      .wrap_err("Failed to request email change")?;
    Ok(ack.message)
  }

  pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<String> {
    let body = PasswordChangeRequest {
      current_password: current_password.to_string(),
      new_password: new_password.to_string(),
    };

    let ack: Acknowledgement = self
      .post_json("/auth/change-password", &body)
      .await
      .wrap_err("Failed to change password")?;
    Ok(ack.message)
  }
}
