use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

pub type MessageId = Uuid;

/// An ordered sequence of annotation rules. Order is application priority:
/// rule i operates on the output of rule i-1, never on the original text.
pub type RuleSet = Vec<Rule>;

// ===== ALERT MESSAGE TYPES =====
// The decoded pager message as handed over by the ingestion side.
// Ingestion and decoding themselves live outside this crate.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertMessage {
    /// Assigned on ingestion; feed entries without one get a fresh id
    #[serde(default = "new_message_id")]
    pub id: MessageId,
    /// Pager address (capcode) the message was received on
    pub address: String,
    pub agency: String,
    pub alias: String,
    /// Raw decoded message text; may carry markup from a prior render pass
    pub message: String,
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

fn new_message_id() -> MessageId {
    Uuid::new_v4()
}

impl AlertMessage {
    pub fn new(address: &str, agency: &str, alias: &str, message: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            address: address.to_string(),
            agency: agency.to_string(),
            alias: alias.to_string(),
            message: message.to_string(),
            received_at: Utc::now(),
        }
    }
}

// ===== ANNOTATION RULE TYPES =====

/// One operator-authored annotation directive.
///
/// Persisted rules may still use the historical field names `match`,
/// `replace` and `highlight` (boolean); the serde aliases and the
/// `RuleMode` deserializer absorb those shapes once, at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Regular-expression source string, matched against the *current*
    /// accumulated text (not necessarily the original message)
    #[serde(alias = "match")]
    pub pattern: String,
    /// Missing/undefined mode in stored data means the plain highlight
    #[serde(default, alias = "highlight")]
    pub mode: RuleMode,
    /// Substitution text for `Replace` (supports `$n` back-references);
    /// tooltip label for the two highlight modes
    #[serde(default, alias = "replace")]
    pub replacement: String,
}

impl Rule {
    pub fn replace(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            mode: RuleMode::Replace,
            replacement: replacement.to_string(),
        }
    }

    pub fn plain(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            mode: RuleMode::Plain,
            replacement: label.to_string(),
        }
    }

    pub fn styled(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            mode: RuleMode::Styled,
            replacement: label.to_string(),
        }
    }
}

/// How a rule rewrites the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleMode {
    /// Substitute the first match with the replacement text
    Replace,
    /// Wrap the first unguarded match in a styled anchor (tooltip + CSS class)
    Styled,
    /// Wrap the first unguarded match in an unstyled anchor (tooltip only)
    #[default]
    Plain,
}

impl RuleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleMode::Replace => "replace",
            RuleMode::Styled => "styled",
            RuleMode::Plain => "plain",
        }
    }
}

impl Serialize for RuleMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Stored configurations encode the mode three ways: the canonical strings,
// the legacy boolean (true = styled, false = plain), or nothing at all.
// Migrated rows frequently carry no mode field; those behave as plain.
impl<'de> Deserialize<'de> for RuleMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ModeVisitor;

        impl<'de> Visitor<'de> for ModeVisitor {
            type Value = RuleMode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("\"replace\", \"styled\", \"plain\", or a legacy boolean")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<RuleMode, E> {
                Ok(if value { RuleMode::Styled } else { RuleMode::Plain })
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<RuleMode, E> {
                match value {
                    "replace" => Ok(RuleMode::Replace),
                    "styled" | "highlight" => Ok(RuleMode::Styled),
                    "plain" | "" => Ok(RuleMode::Plain),
                    other => Err(de::Error::unknown_variant(
                        other,
                        &["replace", "styled", "plain"],
                    )),
                }
            }

            fn visit_unit<E: de::Error>(self) -> Result<RuleMode, E> {
                Ok(RuleMode::Plain)
            }
        }

        deserializer.deserialize_any(ModeVisitor)
    }
}
