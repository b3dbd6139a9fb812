//! # Field Normalizer
//!
//! Attribute names are free-form in the text file, but a handful of common
//! spellings are folded onto one canonical name before anything is stored or
//! compared. `hostname: x` and `host: y` therefore land in the same value list.
//!
//! This module is also the single source of truth for:
//!
//! - **Field groups**: the well-known fields, grouped by what they describe.
//!   Grouped fields are emitted first, in [`FIELD_ORDER`]; terse output emits
//!   nothing else.
//! - **Confidentiality**: a field is confidential iff its canonical name is
//!   `pass` or starts with `!`.
//!
//! ## Aliases
//!
//! | Input | Canonical |
//! |-------|-----------|
//! | `hostname`, `machine` | `host` |
//! | `url`, `website` | `uri` |
//! | `user`, `username` | `login` |
//! | `nicname` | `nic-hdl` |
//! | `password`, `!pass` | `pass` |
//! | `mail` | `email` |
//!
//! ## Manual Ordering
//!
//! Sorting ignores a leading run of non-word characters, so a field written as
//! `!2fa.oath-psk` sorts as `2fa.oath-psk`, and a prefix such as `-` can be
//! used by hand to pull a field around without changing its meaning.

/// Spelling variants folded onto canonical field names.
pub const FIELD_ALIASES: &[(&str, &str)] = &[
    ("hostname", "host"),
    ("machine", "host"),
    ("url", "uri"),
    ("website", "uri"),
    ("user", "login"),
    ("username", "login"),
    ("nicname", "nic-hdl"),
    ("password", "pass"),
    ("!pass", "pass"),
    ("mail", "email"),
];

/// A named set of well-known fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Object,
    Username,
    Password,
    Email,
}

impl FieldGroup {
    /// Canonical field names belonging to this group.
    pub const fn members(self) -> &'static [&'static str] {
        match self {
            FieldGroup::Object => &["host", "uri", "realm"],
            FieldGroup::Username => &["login", "nic-hdl"],
            FieldGroup::Password => &["pass", "!pass"],
            FieldGroup::Email => &["email"],
        }
    }
}

/// Emission order of the field groups.
pub const FIELD_ORDER: [FieldGroup; 4] = [
    FieldGroup::Object,
    FieldGroup::Username,
    FieldGroup::Password,
    FieldGroup::Email,
];

/// Canonical name of the password field.
pub const PASSWORD_FIELD: &str = "pass";

/// Attribute that archives overwritten passwords.
pub const PASSWORD_HISTORY_FIELD: &str = "!pass.old";

/// Attribute that carries the OATH preshared key.
pub const OATH_PSK_FIELD: &str = "!2fa.oath-psk";

/// Returns the canonical spelling of a field name.
///
/// Unknown names are returned unchanged.
pub fn translate_field(name: &str) -> &str {
    FIELD_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// Whether values of this canonical field are confidential.
pub fn is_confidential_field(name: &str) -> bool {
    name == PASSWORD_FIELD || name.starts_with('!')
}

/// Whether the canonical field belongs to any known group.
pub fn is_grouped_field(name: &str) -> bool {
    FIELD_ORDER
        .iter()
        .any(|group| group.members().contains(&name))
}

/// Strips a leading run of non-word characters.
pub fn strip_field_prefix(name: &str) -> &str {
    name.trim_start_matches(|c: char| !is_word_char(c))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Orders field names for output.
///
/// Grouped fields come first, group by group in [`FIELD_ORDER`], each group's
/// members sorted by their prefix-stripped name. Unless `terse` is set, the
/// remaining fields follow, sorted the same way. Ties keep the input order.
pub fn sort_fields<'a, I>(names: I, terse: bool) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&'a str> = names.into_iter().collect();
    let mut ordered = Vec::with_capacity(names.len());

    for group in FIELD_ORDER {
        let mut members: Vec<&'a str> = names
            .iter()
            .copied()
            .filter(|name| group.members().contains(name))
            .collect();
        members.sort_by_key(|name| strip_field_prefix(*name));
        ordered.extend(members);
    }

    if !terse {
        let mut rest: Vec<&'a str> = names
            .iter()
            .copied()
            .filter(|name| !is_grouped_field(name))
            .collect();
        rest.sort_by_key(|name| strip_field_prefix(*name));
        ordered.extend(rest);
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_fold_to_canonical_names() {
        assert_eq!(translate_field("hostname"), "host");
        assert_eq!(translate_field("machine"), "host");
        assert_eq!(translate_field("website"), "uri");
        assert_eq!(translate_field("username"), "login");
        assert_eq!(translate_field("!pass"), "pass");
        assert_eq!(translate_field("mail"), "email");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(translate_field("comment.extra"), "comment.extra");
        assert_eq!(translate_field("Host"), "Host");
    }

    #[test]
    fn confidentiality_follows_canonical_name() {
        assert!(is_confidential_field("pass"));
        assert!(is_confidential_field("!pin"));
        assert!(is_confidential_field(OATH_PSK_FIELD));
        assert!(!is_confidential_field("login"));
        assert!(!is_confidential_field("password.hint"));
    }

    #[test]
    fn strip_prefix_removes_leading_punctuation_only() {
        assert_eq!(strip_field_prefix("!2fa.oath-psk"), "2fa.oath-psk");
        assert_eq!(strip_field_prefix("--note"), "note");
        assert_eq!(strip_field_prefix("_private"), "_private");
        assert_eq!(strip_field_prefix("plain"), "plain");
        assert_eq!(strip_field_prefix("!!"), "");
    }

    #[test]
    fn grouped_fields_come_first_in_group_order() {
        let names = ["zeta", "email", "pass", "login", "uri", "host", "!pin"];
        let sorted = sort_fields(names, false);
        assert_eq!(
            sorted,
            vec!["host", "uri", "login", "pass", "email", "!pin", "zeta"]
        );
    }

    #[test]
    fn group_members_sort_alphabetically() {
        let sorted = sort_fields(["uri", "realm", "host"], false);
        assert_eq!(sorted, vec!["host", "realm", "uri"]);
    }

    #[test]
    fn terse_drops_ungrouped_fields() {
        let sorted = sort_fields(["zeta", "login", "!pin"], true);
        assert_eq!(sorted, vec!["login"]);
    }

    #[test]
    fn manual_prefix_controls_ungrouped_order() {
        let sorted = sort_fields(["b.note", "-a.note", "!c.secret"], false);
        assert_eq!(sorted, vec!["-a.note", "b.note", "!c.secret"]);
    }
}
