//! HTTP transport shared by every domain accessor.
//!
//! Credentials travel in cookies: the underlying client carries a cookie store,
//! so every call after login is authenticated without caller involvement. The
//! one exception is the email-verification bootstrap, which passes its token
//! explicitly as a query parameter plus bearer header.

use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use super::error::ApiError;

/// Client for the StudyHub backend API.
#[derive(Clone)]
pub struct HubClient {
  http: reqwest::Client,
  base: Url,
}

impl HubClient {
  pub fn new(base_url: &str) -> Result<Self, ApiError> {
    let http = reqwest::Client::builder()
      .cookie_store(true)
      .build()
      .map_err(ApiError::Network)?;
    let base = Url::parse(base_url)?;

    Ok(Self { http, base })
  }

  pub fn base_url(&self) -> &Url {
    &self.base
  }

  fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
    Ok(self.base.join(path)?)
  }

  /// Send a request; non-success statuses become [`ApiError::Status`] with the
  /// decoded error body when the server sent one.
  async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await.map_err(ApiError::Network)?;
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }

    let reason = status.canonical_reason().unwrap_or("request failed").to_string();
    let body = response.bytes().await.unwrap_or_default();
    Err(shape_error(status.as_u16(), &reason, &body))
  }

  pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
    let response = self.execute(self.http.get(self.endpoint(path)?)).await?;
    decode_json(response).await
  }

  /// GET with an explicit bearer token. Only the email-verification callback
  /// uses this; every other call is cookie-credentialed.
  pub async fn get_json_with_bearer<T: DeserializeOwned>(
    &self,
    path: &str,
    token: &str,
  ) -> Result<T, ApiError> {
    let request = self.http.get(self.endpoint(path)?).bearer_auth(token);
    let response = self.execute(request).await?;
    decode_json(response).await
  }

  /// GET returning the raw body (signed previews, generated PDFs).
  pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
    let response = self.execute(self.http.get(self.endpoint(path)?)).await?;
    Ok(response.bytes().await.map_err(ApiError::Network)?.to_vec())
  }

  pub async fn get_text(&self, path: &str) -> Result<String, ApiError> {
    let response = self.execute(self.http.get(self.endpoint(path)?)).await?;
    response.text().await.map_err(ApiError::Network)
  }

  pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    let request = self.http.post(self.endpoint(path)?).json(body);
    let response = self.execute(request).await?;
    decode_json(response).await
  }

  /// POST with no request body.
  pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
    let response = self.execute(self.http.post(self.endpoint(path)?)).await?;
    decode_json(response).await
  }

  pub async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    let request = self.http.put(self.endpoint(path)?).json(body);
    let response = self.execute(request).await?;
    decode_json(response).await
  }

  /// PATCH with no request body (status toggles).
  pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
    let response = self.execute(self.http.patch(self.endpoint(path)?)).await?;
    decode_json(response).await
  }

  pub async fn post_multipart<T: DeserializeOwned>(
    &self,
    path: &str,
    form: Form,
  ) -> Result<T, ApiError> {
    let request = self.http.post(self.endpoint(path)?).multipart(form);
    let response = self.execute(request).await?;
    decode_json(response).await
  }

  pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
    let response = self.execute(self.http.delete(self.endpoint(path)?)).await?;
    decode_json(response).await
  }

  /// DELETE carrying a JSON body (the image-cleanup endpoint addresses the
  /// target by URL, not path).
  pub async fn delete_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    let request = self.http.delete(self.endpoint(path)?).json(body);
    let response = self.execute(request).await?;
    decode_json(response).await
  }
}

/// Decode a JSON body. HTTP 204 carries no body and decodes as JSON `null`, so
/// `Option<T>` and `()` targets resolve to their empty values.
async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
  if response.status() == StatusCode::NO_CONTENT {
    return serde_json::from_value(Value::Null).map_err(ApiError::Decode);
  }
  let bytes = response.bytes().await.map_err(ApiError::Network)?;
  serde_json::from_slice(&bytes).map_err(ApiError::Decode)
}

/// Build the error for a non-success response from its status line and body.
///
/// Prefers the body's `detail`, then `message`, then the HTTP status text.
fn shape_error(status: u16, reason: &str, body: &[u8]) -> ApiError {
  let payload: Option<Value> = serde_json::from_slice(body).ok();
  let message = payload
    .as_ref()
    .and_then(|v| v.get("detail").or_else(|| v.get("message")))
    .and_then(Value::as_str)
    .map(str::to_owned)
    .unwrap_or_else(|| reason.to_owned());

  ApiError::Status {
    status,
    message,
    payload,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_shape_error_prefers_detail() {
    let body = br#"{"detail": "Email is already in use", "message": "other"}"#;
    let err = shape_error(409, "Conflict", body);

    match err {
      ApiError::Status { status, message, payload } => {
        assert_eq!(status, 409);
        assert_eq!(message, "Email is already in use");
        assert!(payload.is_some());
      }
      other => panic!("expected Status, got {:?}", other),
    }
  }

  #[test]
  fn test_shape_error_falls_back_to_message_field() {
    let body = br#"{"message": "Course not found"}"#;
    let err = shape_error(404, "Not Found", body);

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "server returned 404: Course not found");
  }

  #[test]
  fn test_shape_error_non_json_body_uses_status_text() {
    let err = shape_error(502, "Bad Gateway", b"<html>upstream error</html>");

    match err {
      ApiError::Status { message, payload, .. } => {
        assert_eq!(message, "Bad Gateway");
        assert!(payload.is_none());
      }
      other => panic!("expected Status, got {:?}", other),
    }
  }

  #[test]
  fn test_auth_failure_detection() {
    let err = shape_error(401, "Unauthorized", b"{}");
    assert!(err.is_auth_failure());

    let err = shape_error(500, "Internal Server Error", b"{}");
    assert!(!err.is_auth_failure());
  }
}
