//! Outbound request descriptions.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;

/// Where the parameter set travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// GET with parameters in the query string.
    Query,
    /// POST with an `application/x-www-form-urlencoded` body.
    Form,
}

/// Ordered upstream parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet(Vec<(&'static str, String)>);

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.0.push((key, value.into()));
        self
    }

    /// Add `key` only when `value` is present and non-empty.
    pub fn with_optional(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.with(key, v),
            _ => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(k, _)| *k)
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }

    /// Copy with credential-bearing values masked, for logging.
    pub fn redacted(&self) -> RedactedParams<'_> {
        RedactedParams(self)
    }
}

const SECRET_KEYS: &[&str] = &["token", "api_key", "key"];

/// Display adapter that masks credential values.
pub struct RedactedParams<'a>(&'a ParamSet);

impl fmt::Display for RedactedParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.pairs().iter().enumerate() {
            if i > 0 {
                write!(f, "&")?;
            }
            if SECRET_KEYS.contains(key) {
                write!(f, "{}=***", key)?;
            } else {
                write!(f, "{}={}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Basic-auth framing for an outbound call.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything needed to issue one call against the upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub placement: Placement,
    pub params: ParamSet,
    pub basic_auth: Option<BasicAuth>,
    pub timeout: Duration,
}

impl OutboundRequest {
    pub fn query(params: ParamSet, timeout: Duration) -> Self {
        Self {
            placement: Placement::Query,
            params,
            basic_auth: None,
            timeout,
        }
    }

    pub fn form(params: ParamSet, timeout: Duration) -> Self {
        Self {
            placement: Placement::Form,
            params,
            basic_auth: None,
            timeout,
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }
}

/// Caller-supplied filters for a record fetch.
///
/// Deserialized from the query string (GET) or the request body (POST).
/// Numbers are accepted and kept as their decimal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordFilter {
    #[serde(default, deserialize_with = "lenient_string")]
    pub dt1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dt2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub records: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub filternum: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub filtercli: Option<String>,
}

impl RecordFilter {
    /// Build the upstream parameter set: credential and `records` always,
    /// filters only when supplied with a non-empty value.
    pub fn to_params(&self, token: &str, default_records: &str) -> ParamSet {
        let records = match self.records.as_deref() {
            Some(r) if !r.is_empty() => r,
            _ => default_records,
        };

        ParamSet::new()
            .with("token", token)
            .with("records", records)
            .with_optional("dt1", self.dt1.as_deref())
            .with_optional("dt2", self.dt2.as_deref())
            .with_optional("filternum", self.filternum.as_deref())
            .with_optional("filtercli", self.filtercli.as_deref())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientVisitor;

    impl<'de> serde::de::Visitor<'de> for LenientVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or null")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}
