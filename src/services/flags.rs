use crate::domain::models::Define;

pub const BERRY_FEATURE_FLAG: &str = "FT_BERRY";

/// Splits a build flag string on whitespace, shell style. Single or double
/// quotes group characters into one token and are dropped. A backslash
/// outside quotes takes the next character literally; inside double quotes
/// it only escapes `"` and `\`.
pub fn split_flags(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if c == '\\' => match chars.peek() {
                Some(&next) if next == '"' || next == '\\' => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push(c),
            },
            Some(_) => current.push(c),
            None if c == '\\' => {
                current.push(chars.next().unwrap_or(c));
                in_token = true;
            }
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

fn define_from(raw: &str) -> Option<Define> {
    let define = match raw.split_once('=') {
        Some((name, value)) => Define::Valued {
            name: name.to_string(),
            value: value.to_string(),
        },
        None => Define::Bare(raw.to_string()),
    };
    if define.name().is_empty() {
        return None;
    }
    Some(define)
}

/// Extracts preprocessor definitions (`-DNAME`, `-DNAME=VALUE`, `-D NAME`)
/// from a build flag string. Everything else is ignored.
pub fn parse_defines(flags: &str) -> Vec<Define> {
    let mut defines = Vec::new();
    let mut tokens = split_flags(flags).into_iter();
    while let Some(token) = tokens.next() {
        let raw = if token == "-D" {
            match tokens.next() {
                Some(next) => next,
                None => break,
            }
        } else if let Some(rest) = token.strip_prefix("-D") {
            rest.to_string()
        } else {
            continue;
        };
        if let Some(define) = define_from(&raw) {
            defines.push(define);
        }
    }
    defines
}

/// True only for a `NAME=1` definition. Bare names never match.
pub fn feature_is_set(defines: &[Define], flag: &str) -> bool {
    defines
        .iter()
        .any(|d| d.name() == flag && d.value() == Some("1"))
}

/// The definition that decides `feature_is_set`: the first `NAME=1` when
/// present, otherwise the last definition of `NAME`.
pub fn find_define<'a>(defines: &'a [Define], flag: &str) -> Option<&'a Define> {
    defines
        .iter()
        .find(|d| d.name() == flag && d.value() == Some("1"))
        .or_else(|| defines.iter().rev().find(|d| d.name() == flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valued(name: &str, value: &str) -> Define {
        Define::Valued {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn feature_requires_exact_value_one() {
        assert!(feature_is_set(&[valued("FT_BERRY", "1")], "FT_BERRY"));
        assert!(!feature_is_set(&[valued("FT_BERRY", "0")], "FT_BERRY"));
        assert!(!feature_is_set(&[valued("FT_BERRY", "true")], "FT_BERRY"));
        assert!(!feature_is_set(&[valued("FT_BERRY", " 1")], "FT_BERRY"));
    }

    #[test]
    fn bare_define_never_matches() {
        let defines = vec![Define::Bare("FT_BERRY".to_string())];
        assert!(!feature_is_set(&defines, "FT_BERRY"));
    }

    #[test]
    fn names_match_exactly() {
        let defines = vec![valued("FT_BERRY_EXTRA", "1"), valued("ft_berry", "1")];
        assert!(!feature_is_set(&defines, "FT_BERRY"));
        assert!(!feature_is_set(&[], "FT_BERRY"));
    }

    #[test]
    fn any_matching_define_counts() {
        let defines = vec![valued("FT_BERRY", "0"), valued("FT_BERRY", "1")];
        assert!(feature_is_set(&defines, "FT_BERRY"));
    }

    #[test]
    fn parses_platformio_style_flags() {
        let defines = parse_defines(
            "-Os -DFT_BERRY=1 -D FT_MQTT=0 -DCORE_DEBUG -Ilib/include -D\"APP_NAME=Rack One\"",
        );
        assert_eq!(
            defines,
            vec![
                valued("FT_BERRY", "1"),
                valued("FT_MQTT", "0"),
                Define::Bare("CORE_DEBUG".to_string()),
                valued("APP_NAME", "Rack One"),
            ]
        );
    }

    #[test]
    fn quoted_value_is_unwrapped() {
        let defines = parse_defines("'-DFT_BERRY=1' -DVERSION=\"2.1\"");
        assert!(feature_is_set(&defines, "FT_BERRY"));
        assert_eq!(
            find_define(&defines, "VERSION").and_then(Define::value),
            Some("2.1")
        );
    }

    #[test]
    fn escaped_quotes_survive_into_value() {
        let defines = parse_defines(r#"-D APP_NAME=\"ESP32-Sveltekit\" -D FT_BERRY=1"#);
        assert_eq!(
            defines,
            vec![
                valued("APP_NAME", "\"ESP32-Sveltekit\""),
                valued("FT_BERRY", "1"),
            ]
        );
    }

    #[test]
    fn backslash_rules_follow_shell_quoting() {
        assert_eq!(split_flags(r#"a\ b c"#), vec!["a b", "c"]);
        assert_eq!(split_flags(r#""x\"y\\z\n""#), vec![r#"x"y\z\n"#]);
        assert_eq!(split_flags(r#"'x\y'"#), vec![r#"x\y"#]);
        assert_eq!(split_flags("tail\\"), vec!["tail\\"]);
    }

    #[test]
    fn find_define_agrees_with_feature_check() {
        let defines = parse_defines("-DFT_BERRY=1 -DFT_BERRY=0 -DFT_NTP=2 -DFT_NTP=3");
        assert!(feature_is_set(&defines, "FT_BERRY"));
        assert_eq!(find_define(&defines, "FT_BERRY").and_then(Define::value), Some("1"));
        assert_eq!(find_define(&defines, "FT_NTP").and_then(Define::value), Some("3"));
        assert!(find_define(&defines, "FT_MQTT").is_none());
    }

    #[test]
    fn empty_names_and_dangling_switch_are_dropped() {
        assert!(parse_defines("-D=1 -D").is_empty());
        assert_eq!(parse_defines("-DEMPTY="), vec![valued("EMPTY", "")]);
    }

    #[test]
    fn split_collapses_whitespace() {
        assert_eq!(split_flags("  a\t b\n\nc "), vec!["a", "b", "c"]);
        assert_eq!(split_flags("\"\""), vec![""]);
        assert!(split_flags("   ").is_empty());
    }
}
