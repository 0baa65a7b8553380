//! Session observation and routing decisions.
//!
//! The backend owns the session state machine; this module only watches it.
//! The access token is a signed JWT whose payload we decode — never verify —
//! to read the user id, email, and profile-completion flag. Any token that
//! fails to decode is treated exactly like no token at all.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

/// Claims the client reads out of the session token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
  pub user_id: String,
  pub email: String,
  pub profile_complete: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawClaims {
  #[serde(default)]
  sub: String,
  #[serde(default)]
  email: String,
  #[serde(default)]
  profile_complete: bool,
  #[serde(default)]
  user_metadata: RawMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
  #[serde(default)]
  profile_complete: bool,
}

/// Decode the payload section of a JWT-shaped token. Returns `None` on any
/// structural, base64, or JSON failure.
pub fn decode_claims(token: &str) -> Option<SessionClaims> {
  let payload = token.split('.').nth(1)?;
  let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
  let raw: RawClaims = serde_json::from_slice(&bytes).ok()?;

  // The completion flag lives either at the top level or inside user_metadata,
  // depending on how the backend minted the token.
  let profile_complete = raw.profile_complete || raw.user_metadata.profile_complete;

  Some(SessionClaims {
    user_id: raw.sub,
    email: raw.email,
    profile_complete,
  })
}

/// Observed session state: anonymous until a token decodes, then split on the
/// profile-completion claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
  Anonymous,
  ProfileIncomplete(SessionClaims),
  Active(SessionClaims),
}

impl SessionState {
  pub fn claims(&self) -> Option<&SessionClaims> {
    match self {
      SessionState::Anonymous => None,
      SessionState::ProfileIncomplete(claims) | SessionState::Active(claims) => Some(claims),
    }
  }

  pub fn is_authenticated(&self) -> bool {
    !matches!(self, SessionState::Anonymous)
  }
}

/// Derive the session state from the last observed token.
pub fn session_state(token: Option<&str>) -> SessionState {
  match token.and_then(decode_claims) {
    None => SessionState::Anonymous,
    Some(claims) if claims.profile_complete => SessionState::Active(claims),
    Some(claims) => SessionState::ProfileIncomplete(claims),
  }
}

/// Navigation targets the view layer routes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  Login,
  /// Email confirmation screen, carrying the address the mail went to.
  ConfirmEmail { email: String },
  CompleteProfile,
  Courses,
}

/// Registration always lands on the confirmation screen for the submitted
/// address; the session only begins once the emailed link is followed.
pub fn route_after_register(email: &str) -> Route {
  Route::ConfirmEmail {
    email: email.to_string(),
  }
}

/// Where a session in the given state belongs.
pub fn landing_route(state: &SessionState) -> Route {
  match state {
    SessionState::Anonymous => Route::Login,
    SessionState::ProfileIncomplete(_) => Route::CompleteProfile,
    SessionState::Active(_) => Route::Courses,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn token_with_payload(payload: &str) -> String {
    format!(
      "header.{}.signature",
      URL_SAFE_NO_PAD.encode(payload.as_bytes())
    )
  }

  #[test]
  fn test_decode_valid_token() {
    let token = token_with_payload(
      r#"{"sub": "u-1", "email": "a@x.com", "profile_complete": true}"#,
    );
    let claims = decode_claims(&token).unwrap();

    assert_eq!(claims.user_id, "u-1");
    assert_eq!(claims.email, "a@x.com");
    assert!(claims.profile_complete);
  }

  #[test]
  fn test_completion_flag_in_user_metadata() {
    let token = token_with_payload(
      r#"{"sub": "u-1", "email": "a@x.com", "user_metadata": {"profile_complete": true}}"#,
    );
    assert!(decode_claims(&token).unwrap().profile_complete);
  }

  #[test]
  fn test_malformed_token_is_anonymous() {
    // Structurally broken, bad base64, and bad JSON all read as anonymous.
    for token in ["", "no-dots-here", "a.!!!not-base64!!!.c", &token_with_payload("{broken")] {
      assert_eq!(session_state(Some(token)), SessionState::Anonymous);
    }
    assert_eq!(session_state(None), SessionState::Anonymous);
  }

  #[test]
  fn test_state_splits_on_completion() {
    let incomplete = token_with_payload(r#"{"sub": "u", "email": "e", "profile_complete": false}"#);
    assert!(matches!(
      session_state(Some(&incomplete)),
      SessionState::ProfileIncomplete(_)
    ));

    let complete = token_with_payload(r#"{"sub": "u", "email": "e", "profile_complete": true}"#);
    assert!(matches!(session_state(Some(&complete)), SessionState::Active(_)));
  }

  #[test]
  fn test_register_routes_to_confirmation_with_email() {
    assert_eq!(
      route_after_register("a@x.com"),
      Route::ConfirmEmail {
        email: "a@x.com".to_string()
      }
    );
  }

  #[test]
  fn test_landing_routes() {
    assert_eq!(landing_route(&SessionState::Anonymous), Route::Login);

    let claims = SessionClaims {
      user_id: "u".into(),
      email: "e".into(),
      profile_complete: false,
    };
    assert_eq!(
      landing_route(&SessionState::ProfileIncomplete(claims.clone())),
      Route::CompleteProfile
    );

    let claims = SessionClaims {
      profile_complete: true,
      ..claims
    };
    assert_eq!(landing_route(&SessionState::Active(claims)), Route::Courses);
  }
}
