use common::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Stored values these enums do not list are kept as `Other` so that a
/// load never fails and a save writes them back untouched. Parsing user
/// input through `FromStr` stays strict.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReplyTone {
    #[default]
    Friendly,
    Formal,
    Casual,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReplyStructure {
    #[default]
    GreetingAnswerAdditionalClosing,
    GreetingAnswerClosing,
    AnswerAdditionalClosing,
    /// Follow `custom_instructions` instead of a fixed layout.
    Custom,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReplyLength {
    Short,
    #[default]
    Medium,
    Long,
    Other(String),
}

macro_rules! wire_enum_str {
    ($ty:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(value) => value,
                }
            }

            pub fn variants() -> &'static [&'static str] {
                &[$($wire),+]
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Other(value),
                }
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl FromStr for $ty {
            type Err = DeskError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(DeskError::validation(format!(
                        "unknown {} '{}', expected one of: {}",
                        stringify!($ty),
                        other,
                        Self::variants().join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum_str!(ReplyTone {
    Friendly => "friendly",
    Formal => "formal",
    Casual => "casual",
});

wire_enum_str!(ReplyStructure {
    GreetingAnswerAdditionalClosing => "greeting_answer_additional_closing",
    GreetingAnswerClosing => "greeting_answer_closing",
    AnswerAdditionalClosing => "answer_additional_closing",
    Custom => "custom",
});

wire_enum_str!(ReplyLength {
    Short => "short",
    Medium => "medium",
    Long => "long",
});

/// How the backend AI should shape generated replies.
///
/// The backend stores this object verbatim, so the wire names follow the
/// camelCase keys the settings page has always sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseSettings {
    pub greeting: String,
    pub closing: String,
    pub tone: ReplyTone,
    pub structure: ReplyStructure,
    pub custom_instructions: String,
    pub response_length: ReplyLength,
    pub include_emoji: bool,
    pub personal_touch: bool,
    /// Keys this client does not know about, written back as they came.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ResponseSettings {
    fn default() -> Self {
        Self {
            greeting: "안녕하세요! RPA펜션입니다 😊".to_string(),
            closing: "감사합니다. 좋은 하루 되세요!".to_string(),
            tone: ReplyTone::default(),
            structure: ReplyStructure::default(),
            custom_instructions: String::new(),
            response_length: ReplyLength::default(),
            include_emoji: true,
            personal_touch: true,
            extra: Map::new(),
        }
    }
}

impl ResponseSettings {
    /// Field names accepted by [`ResponseSettings::set_field`].
    pub const FIELDS: [&'static str; 8] = [
        "greeting",
        "closing",
        "tone",
        "structure",
        "custom_instructions",
        "response_length",
        "include_emoji",
        "personal_touch",
    ];

    /// Update one setting from its textual form. Accepts snake_case and
    /// camelCase keys.
    pub fn set_field(&mut self, key: &str, value: &str) -> DeskResult<()> {
        match normalize_key(key).as_str() {
            "greeting" => self.greeting = value.to_string(),
            "closing" => self.closing = value.to_string(),
            "tone" => self.tone = value.parse()?,
            "structure" => self.structure = value.parse()?,
            "custom_instructions" => self.custom_instructions = value.to_string(),
            "response_length" => self.response_length = value.parse()?,
            "include_emoji" => self.include_emoji = parse_flag(key, value)?,
            "personal_touch" => self.personal_touch = parse_flag(key, value)?,
            _ => {
                return Err(DeskError::validation(format!(
                    "unknown setting '{key}', expected one of: {}",
                    Self::FIELDS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.trim().chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else if ch == '-' {
            out.push('_');
        } else {
            out.push(ch);
        }
    }
    out
}

fn parse_flag(key: &str, value: &str) -> DeskResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(DeskError::validation(format!(
            "'{key}' expects true/false, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format_is_camel_case() {
        let value = serde_json::to_value(ResponseSettings::default()).unwrap();
        assert_eq!(value["tone"], json!("friendly"));
        assert_eq!(value["structure"], json!("greeting_answer_additional_closing"));
        assert_eq!(value["responseLength"], json!("medium"));
        assert_eq!(value["includeEmoji"], json!(true));
        assert_eq!(value["customInstructions"], json!(""));
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: ResponseSettings =
            serde_json::from_value(json!({ "tone": "formal", "includeEmoji": false })).unwrap();
        assert_eq!(settings.tone, ReplyTone::Formal);
        assert!(!settings.include_emoji);
        assert_eq!(settings.response_length, ReplyLength::Medium);
        assert!(settings.personal_touch);
    }

    #[test]
    fn test_unknown_values_and_keys_survive_round_trip() {
        let stored = json!({
            "greeting": "Hello from Jeju",
            "tone": "warm",
            "responseLength": "long",
            "extraKey": 1,
        });
        let settings: ResponseSettings = serde_json::from_value(stored).unwrap();
        assert_eq!(settings.greeting, "Hello from Jeju");
        assert_eq!(settings.tone, ReplyTone::Other("warm".to_string()));
        assert_eq!(settings.response_length, ReplyLength::Long);
        assert_eq!(settings.extra.get("extraKey"), Some(&json!(1)));

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["tone"], json!("warm"));
        assert_eq!(value["extraKey"], json!(1));
        assert_eq!(value["greeting"], json!("Hello from Jeju"));
    }

    #[test]
    fn test_set_field_accepts_both_key_styles() {
        let mut settings = ResponseSettings::default();
        settings.set_field("responseLength", "long").unwrap();
        settings.set_field("include_emoji", "off").unwrap();
        settings.set_field("custom-instructions", "Mention the BBQ area").unwrap();

        assert_eq!(settings.response_length, ReplyLength::Long);
        assert!(!settings.include_emoji);
        assert_eq!(settings.custom_instructions, "Mention the BBQ area");
    }

    #[test]
    fn test_set_field_rejects_bad_values() {
        let mut settings = ResponseSettings::default();
        assert!(settings.set_field("tone", "sarcastic").is_err());
        assert!(settings.set_field("include_emoji", "maybe").is_err());
        assert!(settings.set_field("font", "serif").is_err());
        assert_eq!(settings, ResponseSettings::default());
    }
}
