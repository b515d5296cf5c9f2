use crate::report::CheckError;

/// Families that never need whitelisting: CSS generic families and global
/// keywords.
const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "ui-serif",
    "ui-sans-serif",
    "ui-monospace",
    "ui-rounded",
    "emoji",
    "math",
    "inherit",
    "initial",
    "unset",
    "revert",
];

/// Checks every `font-family` declaration in the stylesheet text against the
/// whitelist. Offending families are reduced into one comma-joined error.
/// Synchronous: plain text scanning over already-read file contents.
pub fn check_fonts(css: &str, whitelist: &[String]) -> Vec<CheckError> {
    let mut offenders: Vec<String> = Vec::new();

    for family in declared_families(css) {
        let allowed = family.starts_with("var(")
            || GENERIC_FAMILIES
                .iter()
                .any(|generic| generic.eq_ignore_ascii_case(&family))
            || whitelist
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&family));
        if !allowed && !offenders.iter().any(|seen| seen == &family) {
            offenders.push(family);
        }
    }

    if offenders.is_empty() {
        Vec::new()
    } else {
        vec![CheckError::AlternativeFonts {
            fonts: offenders.join(", "),
        }]
    }
}

/// Extracts the family names from every `font-family:` declaration, in
/// declaration order, quotes stripped.
fn declared_families(css: &str) -> Vec<String> {
    let mut families = Vec::new();
    let stripped = strip_comments(css);
    let mut rest = stripped.as_str();

    while let Some(at) = rest.find("font-family") {
        rest = &rest[at + "font-family".len()..];
        let Some(colon) = rest.find(':') else { break };
        let value_start = &rest[colon + 1..];
        let end = value_start
            .find([';', '}'])
            .unwrap_or(value_start.len());
        let value = &value_start[..end];

        for part in value.split(',') {
            let family = part.trim().trim_matches(['"', '\'']).trim();
            if !family.is_empty() {
                families.push(family.to_string());
            }
        }
        rest = &value_start[end..];
    }

    families
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(open) = rest.find("/*") {
        out.push_str(&rest[..open]);
        match rest[open..].find("*/") {
            Some(close) => rest = &rest[open + close + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}
