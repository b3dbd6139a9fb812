//! Whole-database exports.
//!
//! | Format | Output |
//! |--------|--------|
//! | `storage` (default) | the file format, header and flags included |
//! | `safe` | display form, confidential values redacted, tombstones left out |
//! | `json` | structured export, 4-space indented |
//! | `yaml` | structured export |
//!
//! The structured exports reveal every value.

use crate::commands::CmdResult;
use crate::database::Database;
use crate::error::{AccdbError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat {
    #[default]
    Storage,
    Safe,
    Json,
    Yaml,
}

impl FromStr for DumpFormat {
    type Err = AccdbError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "storage" => Ok(DumpFormat::Storage),
            "safe" => Ok(DumpFormat::Safe),
            "json" => Ok(DumpFormat::Json),
            "yaml" => Ok(DumpFormat::Yaml),
            other => Err(AccdbError::UnsupportedFormat(other.to_string())),
        }
    }
}

pub fn render(db: &Database, format: DumpFormat) -> Result<String> {
    match format {
        DumpFormat::Storage => Ok(db.dump(true)),
        DumpFormat::Safe => Ok(db.dump(false)),
        DumpFormat::Json => {
            let mut out = to_json(&db.to_structure())?;
            out.push('\n');
            Ok(out)
        }
        DumpFormat::Yaml => Ok(serde_yaml::to_string(&db.to_structure())?),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn run(db: &Database, format: DumpFormat) -> Result<CmdResult> {
    Ok(CmdResult::default().with_text(render(db, format)?))
}

/// Parses `input` as a database of its own and renders it, leaving every
/// other database untouched.
pub fn convert(input: &str, format: DumpFormat) -> Result<CmdResult> {
    let db = Database::parse(input)?;
    run(&db, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "= site\n\
        {9c2f1f6e-8f0e-4f7e-9a57-0b4f0d7c2d11}\n\
        login: alice\n\
        pass: hunter2\n\
        + web\n";

    #[test]
    fn format_names() {
        assert_eq!("".parse::<DumpFormat>().unwrap(), DumpFormat::Storage);
        assert_eq!("safe".parse::<DumpFormat>().unwrap(), DumpFormat::Safe);
        assert_eq!("json".parse::<DumpFormat>().unwrap(), DumpFormat::Json);
        assert!(matches!(
            "xml".parse::<DumpFormat>(),
            Err(AccdbError::UnsupportedFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn storage_dump_has_header() {
        let text = convert(INPUT, DumpFormat::Storage).unwrap().text;
        assert!(text.starts_with("; vim: ft=accdb:\n= site\n"));
        assert!(text.contains("\tpass: hunter2\n"));
    }

    #[test]
    fn safe_dump_redacts() {
        let text = convert(INPUT, DumpFormat::Safe).unwrap().text;
        assert!(text.starts_with("(item 1)\n= site\n"));
        assert!(text.contains("\tpass: <private[7]>\n"));
    }

    #[test]
    fn json_dump_is_indented_and_revealed() {
        let text = convert(INPUT, DumpFormat::Json).unwrap().text;
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["name"], "site");
        assert_eq!(parsed[0]["data"]["pass"][0], "hunter2");
        assert_eq!(parsed[0]["uuid"], "9c2f1f6e-8f0e-4f7e-9a57-0b4f0d7c2d11");
        assert!(text.contains("\n    {\n        \"name\": \"site\""));
    }

    #[test]
    fn yaml_dump_is_structured() {
        let text = convert(INPUT, DumpFormat::Yaml).unwrap().text;
        let parsed: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed[0]["tags"][0].as_str(), Some("web"));
        assert_eq!(parsed[0]["data"]["login"][0].as_str(), Some("alice"));
    }
}
