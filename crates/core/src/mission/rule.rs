#![forbid(unsafe_code)]

use regex::{Regex, RegexBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Great job! Mission complete!";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Not quite yet. Keep trying!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationType {
    CodeContains,
    VariableChanged,
    CodePattern,
    LineCountIncreased,
}

impl ValidationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodeContains => "code_contains",
            Self::VariableChanged => "variable_changed",
            Self::CodePattern => "code_pattern",
            Self::LineCountIncreased => "line_count_increased",
        }
    }

    pub fn parse(value: &str) -> Result<Self, MissionRuleError> {
        match value.trim() {
            "code_contains" => Ok(Self::CodeContains),
            "variable_changed" => Ok(Self::VariableChanged),
            "code_pattern" => Ok(Self::CodePattern),
            "line_count_increased" => Ok(Self::LineCountIncreased),
            other => Err(MissionRuleError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub enum MissionCheck {
    CodeContains {
        text: String,
    },
    VariableChanged {
        variable: String,
        old_value: String,
        assignment: Regex,
        new_value: Regex,
    },
    CodePattern {
        pattern: Regex,
    },
    LineCountIncreased {
        min_increase: usize,
    },
}

impl MissionCheck {
    pub fn code_contains(text: impl Into<String>) -> Self {
        Self::CodeContains { text: text.into() }
    }

    pub fn variable_changed(
        variable: &str,
        old_value: &str,
        new_value_pattern: &str,
    ) -> Result<Self, MissionRuleError> {
        let variable = variable.trim();
        if variable.is_empty() {
            return Err(MissionRuleError::EmptyVariable);
        }
        let boundary = if variable.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
            r"\b"
        } else {
            ""
        };
        let assignment = compile(
            &format!(r"{boundary}{}[ \t]*=([^\n]*)", regex::escape(variable)),
            false,
        )?;
        let new_value = compile(&format!("^(?:{new_value_pattern})"), false)?;
        Ok(Self::VariableChanged {
            variable: variable.to_string(),
            old_value: old_value.trim().to_string(),
            assignment,
            new_value,
        })
    }

    pub fn code_pattern(pattern: &str) -> Result<Self, MissionRuleError> {
        Ok(Self::CodePattern {
            pattern: compile(pattern, true)?,
        })
    }

    pub fn line_count_increased(min_increase: usize) -> Self {
        Self::LineCountIncreased { min_increase }
    }

    pub fn validation_type(&self) -> ValidationType {
        match self {
            Self::CodeContains { .. } => ValidationType::CodeContains,
            Self::VariableChanged { .. } => ValidationType::VariableChanged,
            Self::CodePattern { .. } => ValidationType::CodePattern,
            Self::LineCountIncreased { .. } => ValidationType::LineCountIncreased,
        }
    }
}

/// A decoded mission rule. Built once per load from the persisted
/// `(validation_type, validation_json)` pair; regexes are already compiled.
#[derive(Clone, Debug)]
pub struct MissionRule {
    pub check: MissionCheck,
    pub success_message: Option<String>,
    pub failure_message: Option<String>,
}

impl MissionRule {
    pub fn new(check: MissionCheck) -> Self {
        Self {
            check,
            success_message: None,
            failure_message: None,
        }
    }

    pub fn with_messages(
        mut self,
        success_message: Option<String>,
        failure_message: Option<String>,
    ) -> Self {
        self.success_message = success_message;
        self.failure_message = failure_message;
        self
    }

    pub fn validation_type(&self) -> ValidationType {
        self.check.validation_type()
    }

    pub fn decode(validation_type: &str, params_json: &str) -> Result<Self, MissionRuleError> {
        let kind = ValidationType::parse(validation_type)?;
        let raw: Value = serde_json::from_str(params_json)
            .map_err(|err| MissionRuleError::InvalidParams(err.to_string()))?;

        let check = match kind {
            ValidationType::CodeContains => {
                let params: CodeContainsParams = params_from(&raw)?;
                MissionCheck::code_contains(params.text)
            }
            ValidationType::VariableChanged => {
                let params: VariableChangedParams = params_from(&raw)?;
                MissionCheck::variable_changed(
                    &params.variable,
                    &params.old_value,
                    &params.new_value_pattern,
                )?
            }
            ValidationType::CodePattern => {
                let params: CodePatternParams = params_from(&raw)?;
                MissionCheck::code_pattern(&params.pattern)?
            }
            ValidationType::LineCountIncreased => {
                let params: LineCountIncreasedParams = params_from(&raw)?;
                MissionCheck::line_count_increased(params.min_increase)
            }
        };

        let messages: RuleMessages = params_from(&raw)?;
        Ok(Self::new(check).with_messages(messages.success_message, messages.failure_message))
    }
}

#[derive(Debug, Deserialize)]
struct CodeContainsParams {
    text: String,
}

#[derive(Debug, Deserialize)]
struct VariableChangedParams {
    variable: String,
    #[serde(deserialize_with = "scalar_text")]
    old_value: String,
    new_value_pattern: String,
}

#[derive(Debug, Deserialize)]
struct CodePatternParams {
    pattern: String,
}

#[derive(Debug, Deserialize)]
struct LineCountIncreasedParams {
    min_increase: usize,
}

#[derive(Debug, Default, Deserialize)]
struct RuleMessages {
    #[serde(default)]
    success_message: Option<String>,
    #[serde(default)]
    failure_message: Option<String>,
}

fn params_from<T: DeserializeOwned>(raw: &Value) -> Result<T, MissionRuleError> {
    T::deserialize(raw).map_err(|err| MissionRuleError::InvalidParams(err.to_string()))
}

// Seed data writes `old_value` both as `"5"` and as `5`.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(if flag { "True" } else { "False" }.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

fn compile(pattern: &str, multi_line: bool) -> Result<Regex, MissionRuleError> {
    RegexBuilder::new(pattern)
        .multi_line(multi_line)
        .size_limit(1 << 20)
        .build()
        .map_err(|err| MissionRuleError::InvalidPattern(err.to_string()))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MissionRuleError {
    UnknownType(String),
    InvalidParams(String),
    InvalidPattern(String),
    EmptyVariable,
}

impl std::fmt::Display for MissionRuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownType(kind) => write!(f, "unknown validation type: {kind}"),
            Self::InvalidParams(detail) => write!(f, "invalid validation params: {detail}"),
            Self::InvalidPattern(detail) => write!(f, "invalid pattern: {detail}"),
            Self::EmptyVariable => write!(f, "variable must not be empty"),
        }
    }
}

impl std::error::Error for MissionRuleError {}
