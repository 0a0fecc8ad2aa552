#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Claim validation (RFC 7519 §4).
//!
//! Runs only after a signature has verified, so every rejection here
//! concerns an authentic token and may say exactly what was wrong.
//! Timestamps are NumericDate seconds; `exp` is required unless the
//! validator opts out.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Map, Value};

use crate::JwtError;

/// The decoded claim set of a token whose signature has not (yet) been
/// checked.
#[derive(Debug, Clone)]
pub struct RawJwt {
    claims: Map<String, Value>,
}

impl RawJwt {
    pub(crate) fn new(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// The `iss` claim.
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.claims.get("iss").and_then(Value::as_str)
    }

    /// The `sub` claim.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.claims.get("sub").and_then(Value::as_str)
    }

    /// The `aud` claim, normalized: a string audience becomes a
    /// one-element list.
    #[must_use]
    pub fn audiences(&self) -> Option<Vec<&str>> {
        match self.claims.get("aud")? {
            Value::String(aud) => Some(vec![aud.as_str()]),
            Value::Array(auds) => auds.iter().map(Value::as_str).collect(),
            _ => None,
        }
    }

    /// The `exp` claim as a UTC instant.
    #[must_use]
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        numeric_date(self.claims.get("exp")?)
    }

    /// The `nbf` claim as a UTC instant.
    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        numeric_date(self.claims.get("nbf")?)
    }

    /// An arbitrary claim by name.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }
}

fn numeric_date(value: &Value) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.as_i64()?, 0)
}

/// A token that passed signature verification and claim validation.
#[derive(Debug, Clone)]
pub struct VerifiedJwt {
    raw: RawJwt,
    type_header: Option<String>,
}

impl VerifiedJwt {
    pub(crate) fn new(raw: RawJwt, type_header: Option<String>) -> Self {
        Self { raw, type_header }
    }

    /// The validated claim set.
    #[must_use]
    pub fn claims(&self) -> &RawJwt {
        &self.raw
    }

    /// The `typ` header, if the token carried one.
    #[must_use]
    pub fn type_header(&self) -> Option<&str> {
        self.type_header.as_deref()
    }
}

/// Declarative acceptance policy for claims and the `typ` header.
#[derive(Debug, Clone)]
pub struct JwtValidator {
    expected_issuer: Option<String>,
    expected_audience: Option<String>,
    expected_type_header: Option<String>,
    clock_skew: TimeDelta,
    allow_missing_expiration: bool,
    fixed_now: Option<DateTime<Utc>>,
}

impl JwtValidator {
    /// Start building a validator.
    #[must_use]
    pub fn builder() -> JwtValidatorBuilder {
        JwtValidatorBuilder::default()
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    /// Validate a claim set and the token's `typ` header.
    ///
    /// # Errors
    /// Returns [`JwtError::Validation`] naming the first unacceptable
    /// claim.
    pub fn validate(&self, raw: &RawJwt, type_header: Option<&str>) -> Result<(), JwtError> {
        let now = self.now();

        match raw.expiration() {
            Some(exp) => {
                if exp + self.clock_skew <= now {
                    return Err(JwtError::Validation("token has expired".to_string()));
                }
            }
            None if !self.allow_missing_expiration => {
                return Err(JwtError::Validation("token has no expiration".to_string()));
            }
            None => {}
        }

        if let Some(nbf) = raw.not_before() {
            if nbf - self.clock_skew > now {
                return Err(JwtError::Validation("token is not yet valid".to_string()));
            }
        }

        if let Some(expected) = &self.expected_issuer {
            if raw.issuer() != Some(expected.as_str()) {
                return Err(JwtError::Validation(format!("issuer is not {expected:?}")));
            }
        }

        if let Some(expected) = &self.expected_audience {
            let accepted = raw
                .audiences()
                .is_some_and(|auds| auds.contains(&expected.as_str()));
            if !accepted {
                return Err(JwtError::Validation(format!("audience does not include {expected:?}")));
            }
        }

        if let Some(expected) = &self.expected_type_header {
            if type_header != Some(expected.as_str()) {
                return Err(JwtError::Validation(format!("typ header is not {expected:?}")));
            }
        }

        Ok(())
    }
}

/// Builder for [`JwtValidator`].
#[derive(Debug, Clone, Default)]
pub struct JwtValidatorBuilder {
    expected_issuer: Option<String>,
    expected_audience: Option<String>,
    expected_type_header: Option<String>,
    clock_skew: Option<TimeDelta>,
    allow_missing_expiration: bool,
    fixed_now: Option<DateTime<Utc>>,
}

impl JwtValidatorBuilder {
    /// Require the `iss` claim to equal `issuer`.
    #[must_use]
    pub fn expect_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Require the `aud` claim to include `audience`.
    #[must_use]
    pub fn expect_audience(mut self, audience: impl Into<String>) -> Self {
        self.expected_audience = Some(audience.into());
        self
    }

    /// Require the `typ` header to equal `typ`.
    #[must_use]
    pub fn expect_type_header(mut self, typ: impl Into<String>) -> Self {
        self.expected_type_header = Some(typ.into());
        self
    }

    /// Tolerate clock drift of up to `skew` in `exp` and `nbf` checks.
    #[must_use]
    pub fn clock_skew(mut self, skew: TimeDelta) -> Self {
        self.clock_skew = Some(skew);
        self
    }

    /// Accept tokens without an `exp` claim.
    #[must_use]
    pub fn allow_missing_expiration(mut self) -> Self {
        self.allow_missing_expiration = true;
        self
    }

    /// Evaluate time-based claims against a fixed instant instead of
    /// the system clock.
    #[must_use]
    pub fn fixed_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    /// Finish the validator.
    #[must_use]
    pub fn build(self) -> JwtValidator {
        JwtValidator {
            expected_issuer: self.expected_issuer,
            expected_audience: self.expected_audience,
            expected_type_header: self.expected_type_header,
            clock_skew: self.clock_skew.unwrap_or(TimeDelta::zero()),
            allow_missing_expiration: self.allow_missing_expiration,
            fixed_now: self.fixed_now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(claims: Value) -> RawJwt {
        match claims {
            Value::Object(map) => RawJwt::new(map),
            _ => unreachable!("tests pass objects"),
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn unexpired_token_is_accepted() {
        let validator = JwtValidator::builder().fixed_now(at(1_000)).build();
        validator.validate(&raw(json!({"exp": 2_000})), None).unwrap();
    }

    #[test]
    fn expired_token_is_rejected() {
        let validator = JwtValidator::builder().fixed_now(at(3_000)).build();
        let err = validator.validate(&raw(json!({"exp": 2_000})), None).unwrap_err();
        assert_eq!(err, JwtError::Validation("token has expired".to_string()));
    }

    #[test]
    fn clock_skew_rescues_a_just_expired_token() {
        let validator = JwtValidator::builder()
            .fixed_now(at(2_100))
            .clock_skew(TimeDelta::seconds(300))
            .build();
        validator.validate(&raw(json!({"exp": 2_000})), None).unwrap();
    }

    #[test]
    fn missing_expiration_is_rejected_by_default() {
        let validator = JwtValidator::builder().fixed_now(at(1_000)).build();
        assert!(validator.validate(&raw(json!({})), None).is_err());

        let lenient =
            JwtValidator::builder().fixed_now(at(1_000)).allow_missing_expiration().build();
        lenient.validate(&raw(json!({})), None).unwrap();
    }

    #[test]
    fn not_yet_valid_token_is_rejected() {
        let validator =
            JwtValidator::builder().fixed_now(at(1_000)).allow_missing_expiration().build();
        let err = validator.validate(&raw(json!({"nbf": 5_000})), None).unwrap_err();
        assert_eq!(err, JwtError::Validation("token is not yet valid".to_string()));
    }

    #[test]
    fn issuer_must_match_when_expected() {
        let validator = JwtValidator::builder()
            .fixed_now(at(1_000))
            .allow_missing_expiration()
            .expect_issuer("issuer-a")
            .build();

        validator.validate(&raw(json!({"iss": "issuer-a"})), None).unwrap();
        assert!(validator.validate(&raw(json!({"iss": "issuer-b"})), None).is_err());
        assert!(validator.validate(&raw(json!({})), None).is_err());
    }

    #[test]
    fn audience_accepts_string_or_list() {
        let validator = JwtValidator::builder()
            .fixed_now(at(1_000))
            .allow_missing_expiration()
            .expect_audience("svc")
            .build();

        validator.validate(&raw(json!({"aud": "svc"})), None).unwrap();
        validator.validate(&raw(json!({"aud": ["other", "svc"]})), None).unwrap();
        assert!(validator.validate(&raw(json!({"aud": "other"})), None).is_err());
        assert!(validator.validate(&raw(json!({})), None).is_err());
    }

    #[test]
    fn typ_header_must_match_when_expected() {
        let validator = JwtValidator::builder()
            .fixed_now(at(1_000))
            .allow_missing_expiration()
            .expect_type_header("JWT")
            .build();

        validator.validate(&raw(json!({})), Some("JWT")).unwrap();
        assert!(validator.validate(&raw(json!({})), Some("other")).is_err());
        assert!(validator.validate(&raw(json!({})), None).is_err());
    }

    #[test]
    fn claim_accessors_read_the_payload() {
        let jwt = raw(json!({
            "iss": "me", "sub": "you", "aud": ["a", "b"],
            "exp": 1_700_000_000, "custom": {"k": 1}
        }));
        assert_eq!(jwt.issuer(), Some("me"));
        assert_eq!(jwt.subject(), Some("you"));
        assert_eq!(jwt.audiences(), Some(vec!["a", "b"]));
        assert_eq!(jwt.expiration(), Some(at(1_700_000_000)));
        assert!(jwt.claim("custom").is_some());
        assert!(jwt.claim("missing").is_none());
    }
}
