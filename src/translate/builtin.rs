//! Bundled translators for common standard-library types.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::core::types::TargetType;
use crate::core::value::Value;
use crate::translate::registry::{TranslationContext, Translation, Translator};

/// Priority reported by the bundled translators. Plugins that want to
/// override them report something higher.
pub const BUILTIN_PRIORITY: u32 = 10;

/// Text to `PathBuf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTranslator;

impl Translator for PathTranslator {
    fn id(&self) -> &str {
        "path"
    }

    fn support_priority(&self, target: &TargetType) -> u32 {
        if target.is_custom::<PathBuf>() {
            BUILTIN_PRIORITY
        } else {
            0
        }
    }

    fn translate(
        &self,
        source: &Value,
        _target: &TargetType,
        _context: &TranslationContext<'_>,
    ) -> Result<Translation> {
        Ok(match source {
            Value::Text(text) => Translation::Value(Value::custom(PathBuf::from(text))),
            _ => Translation::NoMatch,
        })
    }
}

/// Text such as `30s`, `250ms`, `5m`, `2h` or `1d` to `Duration`. A bare
/// number is read as seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationTranslator;

impl DurationTranslator {
    pub fn parse(text: &str) -> Result<Duration> {
        let text = text.trim();
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        let (digits, unit) = text.split_at(split);
        if digits.is_empty() {
            bail!("duration `{}` has no amount", text);
        }

        let amount: u64 = digits
            .parse()
            .with_context(|| format!("duration amount `{}` is out of range", digits))?;

        let secs_per_unit = match unit.trim() {
            "ms" => return Ok(Duration::from_millis(amount)),
            "" | "s" => 1,
            "m" => 60,
            "h" => 60 * 60,
            "d" => 24 * 60 * 60,
            other => bail!("unknown duration unit `{}`", other),
        };

        amount
            .checked_mul(secs_per_unit)
            .map(Duration::from_secs)
            .with_context(|| format!("duration `{}` overflows", text))
    }
}

impl Translator for DurationTranslator {
    fn id(&self) -> &str {
        "duration"
    }

    fn support_priority(&self, target: &TargetType) -> u32 {
        if target.is_custom::<Duration>() {
            BUILTIN_PRIORITY
        } else {
            0
        }
    }

    fn translate(
        &self,
        source: &Value,
        _target: &TargetType,
        _context: &TranslationContext<'_>,
    ) -> Result<Translation> {
        match source {
            Value::Text(text) => Ok(Translation::Value(Value::custom(Self::parse(text)?))),
            Value::U64(secs) => Ok(Translation::Value(Value::custom(Duration::from_secs(*secs)))),
            Value::I64(secs) if *secs >= 0 => Ok(Translation::Value(Value::custom(
                Duration::from_secs(*secs as u64),
            ))),
            _ => Ok(Translation::NoMatch),
        }
    }
}

/// Comma-separated text to `Vec<String>`. Items are trimmed and empty
/// items dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListTranslator;

impl Translator for ListTranslator {
    fn id(&self) -> &str {
        "list"
    }

    fn support_priority(&self, target: &TargetType) -> u32 {
        if target.is_custom::<Vec<String>>() {
            BUILTIN_PRIORITY
        } else {
            0
        }
    }

    fn translate(
        &self,
        source: &Value,
        _target: &TargetType,
        _context: &TranslationContext<'_>,
    ) -> Result<Translation> {
        let Value::Text(text) = source else {
            return Ok(Translation::NoMatch);
        };
        let items: Vec<String> = text
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect();
        Ok(Translation::Value(Value::custom(items)))
    }
}
