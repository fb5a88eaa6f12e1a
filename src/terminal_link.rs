//! Clickable terminal hyperlinks (OSC 8) with a plain-text fallback

use std::io::IsTerminal;

const OSC: &str = "\u{1b}]";
const BEL: &str = "\u{7}";
const SEP: &str = ";";

/// Terminal program version as reported through the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Version {
    major: u32,
    minor: u32,
    patch: u32,
}

/// Parse `1.2.3`, or the dotless `4601` form (`0.46.1`) some terminals use
fn parse_version(version: &str) -> Version {
    let digits_only = version.chars().all(|c| c.is_ascii_digit());
    if digits_only && (3..=4).contains(&version.len()) {
        let (minor, patch) = version.split_at(version.len() - 2);
        return Version {
            major: 0,
            minor: minor.parse().unwrap_or(0),
            patch: patch.parse().unwrap_or(0),
        };
    }

    let mut parts = version.split('.').map(|n| n.parse::<u32>().unwrap_or(0));
    Version {
        major: parts.next().unwrap_or(0),
        minor: parts.next().unwrap_or(0),
        patch: parts.next().unwrap_or(0),
    }
}

/// Decide hyperlink support from an environment lookup, the process
/// arguments and whether the output is a terminal
fn supports_hyperlinks_with<E>(env: E, args: &[String], is_tty: bool) -> bool
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(force) = env("FORCE_HYPERLINK") {
        return !(!force.is_empty() && force.parse::<i64>().ok() == Some(0));
    }

    let has_flag = |flag: &str| args.iter().any(|a| a == &format!("--{}", flag));
    if ["no-hyperlink", "no-hyperlinks", "hyperlink=false", "hyperlink=never"]
        .iter()
        .any(|f| has_flag(f))
    {
        return false;
    }
    if has_flag("hyperlink=true") || has_flag("hyperlink=always") {
        return true;
    }

    // No colors, no hyperlinks
    if env("NO_COLOR").is_some() || env("TERM").as_deref() == Some("dumb") {
        return false;
    }
    if !is_tty || cfg!(windows) {
        return false;
    }
    if env("NETLIFY").is_some() {
        return true;
    }
    if env("CI").is_some() || env("TEAMCITY_VERSION").is_some() {
        return false;
    }

    if let Some(program) = env("TERM_PROGRAM") {
        let version = parse_version(&env("TERM_PROGRAM_VERSION").unwrap_or_default());
        if program == "iTerm.app" {
            return if version.major == 3 {
                version.minor >= 1
            } else {
                version.major > 3
            };
        }
    }

    if let Some(vte) = env("VTE_VERSION") {
        // 0.50.0 advertises support but crashes on it
        if vte == "0.50.0" {
            return false;
        }
        let version = parse_version(&vte);
        return version.major > 0 || version.minor >= 50;
    }

    false
}

/// True if stdout is a terminal that renders OSC 8 hyperlinks
pub fn stdout_supports_hyperlinks() -> bool {
    let args: Vec<String> = std::env::args().collect();
    supports_hyperlinks_with(
        |key| std::env::var(key).ok(),
        &args,
        std::io::stdout().is_terminal(),
    )
}

/// Raw OSC 8 escape sequence for `text` pointing at `url`
pub fn escape_link(text: &str, url: &str) -> String {
    [OSC, "8", SEP, SEP, url, BEL, text, OSC, "8", SEP, SEP, BEL].concat()
}

/// Hyperlink `text` to `url` when supported, otherwise `text (url)`
pub fn terminal_link(text: &str, url: &str) -> String {
    link_for(text, url, stdout_supports_hyperlinks())
}

fn link_for(text: &str, url: &str, supported: bool) -> String {
    if supported {
        escape_link(text, url)
    } else {
        format!("{} (\u{200B}{}\u{200B})", text, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(
            parse_version("3.2.1"),
            Version {
                major: 3,
                minor: 2,
                patch: 1
            }
        );
        assert_eq!(
            parse_version("4601"),
            Version {
                major: 0,
                minor: 46,
                patch: 1
            }
        );
        assert_eq!(parse_version(""), Version::default());
    }

    #[test]
    fn test_force_hyperlink() {
        assert!(supports_hyperlinks_with(env_of(&[("FORCE_HYPERLINK", "1")]), &[], false));
        assert!(supports_hyperlinks_with(env_of(&[("FORCE_HYPERLINK", "")]), &[], false));
        assert!(!supports_hyperlinks_with(env_of(&[("FORCE_HYPERLINK", "0")]), &[], true));
    }

    #[test]
    fn test_flags() {
        let no = vec!["--no-hyperlink".to_string()];
        let yes = vec!["--hyperlink=always".to_string()];
        let vte = env_of(&[("VTE_VERSION", "0.60.0")]);
        assert!(!supports_hyperlinks_with(&vte, &no, true));
        assert!(supports_hyperlinks_with(env_of(&[]), &yes, false));
    }

    #[test]
    fn test_terminal_detection() {
        let iterm = env_of(&[("TERM_PROGRAM", "iTerm.app"), ("TERM_PROGRAM_VERSION", "3.1.0")]);
        let old_iterm = env_of(&[("TERM_PROGRAM", "iTerm.app"), ("TERM_PROGRAM_VERSION", "2.9")]);
        let broken_vte = env_of(&[("VTE_VERSION", "0.50.0")]);
        let new_vte = env_of(&[("VTE_VERSION", "5002")]);
        let ci = env_of(&[("CI", "true"), ("VTE_VERSION", "0.60.0")]);

        if cfg!(windows) {
            return;
        }
        assert!(supports_hyperlinks_with(iterm, &[], true));
        assert!(!supports_hyperlinks_with(old_iterm, &[], true));
        assert!(!supports_hyperlinks_with(broken_vte, &[], true));
        assert!(supports_hyperlinks_with(new_vte, &[], true));
        assert!(!supports_hyperlinks_with(ci, &[], true));
        assert!(!supports_hyperlinks_with(env_of(&[("VTE_VERSION", "0.60.0")]), &[], false));
    }

    #[test]
    fn test_link_rendering() {
        assert_eq!(
            escape_link("docs", "file:///tmp/docs"),
            "\u{1b}]8;;file:///tmp/docs\u{7}docs\u{1b}]8;;\u{7}"
        );
        assert_eq!(
            link_for("docs", "file:///tmp/docs", false),
            "docs (\u{200B}file:///tmp/docs\u{200B})"
        );
    }
}
