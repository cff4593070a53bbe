//! Conversion between raw key descriptors and canonical tokens
//!
//! The forward direction names a physical keystroke (`C-x`, `M-RET`,
//! `S-<left>`); the inverse rebuilds a descriptor from a token for macro
//! replay and synthetic key injection.
//!
//! Modifier prefixes are applied in a fixed order: meta first, then control,
//! then shift, so ctrl+alt+`-` becomes `C-M--`. Shift is only recorded for
//! non-printable keys; printable characters already carry it in their case.

use super::types::{Modifiers, RawKey, SpecialKey, Token};

/// Convert a raw key descriptor into its canonical token
///
/// Returns the empty token when the key cannot be represented, which tells
/// the caller to let the key fall through untouched.
pub fn token_from_raw(raw: &RawKey) -> Token {
    let printable = raw.is_printable();

    let mut key = match raw.char_code {
        Some(' ') => "SPC".to_string(),
        Some(c) if printable => c.to_string(),
        _ => match raw.special.and_then(|special| special_key_name(special, raw.mods)) {
            Some(name) => name,
            None => return Token::empty(),
        },
    };

    if raw.mods.emacs_meta() {
        key = format!("M-{key}");
    }
    if raw.mods.ctrl() {
        key = format!("C-{key}");
    }
    if raw.mods.shift() && !printable {
        key = format!("S-{key}");
    }

    Token::from(key)
}

fn special_key_name(key: SpecialKey, mods: Modifiers) -> Option<String> {
    let name = match key {
        SpecialKey::F(n) if (1..=24).contains(&n) => return Some(format!("<f{n}>")),
        SpecialKey::F(_) => return None,
        SpecialKey::Escape => "ESC",
        SpecialKey::Return | SpecialKey::Enter => "RET",
        SpecialKey::Right => "<right>",
        SpecialKey::Left => "<left>",
        SpecialKey::Up => "<up>",
        SpecialKey::Down => "<down>",
        SpecialKey::PageUp => "<prior>",
        SpecialKey::PageDown => "<next>",
        SpecialKey::End => "<end>",
        SpecialKey::Home => "<home>",
        SpecialKey::Tab => "<tab>",
        SpecialKey::Backspace => "<backspace>",
        SpecialKey::PrintScreen => "<print>",
        SpecialKey::Insert => "<insert>",
        SpecialKey::Pause => "<pause>",
        SpecialKey::Delete => "<delete>",
        // Ctrl+_ arrives with no char code on some Windows layouts
        SpecialKey::Oem102 if mods.ctrl() => "_",
        SpecialKey::Oem102 | SpecialKey::Unidentified(_) => return None,
    };
    Some(name.to_string())
}

/// Rebuild a raw key descriptor from a token
///
/// Inverts every case of [`token_from_raw`]. Tokens that cannot be parsed
/// yield [`RawKey::noop`], which normalizes back to the empty token.
pub fn raw_from_token(token: &str) -> RawKey {
    let mut mods = Modifiers::NONE;
    let mut rest = token;
    while let Some((modifier, tail)) = split_modifier(rest) {
        mods = mods | modifier;
        rest = tail;
    }

    if let Some(name) = rest.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        return match bracketed_key(name) {
            Some(special) => RawKey::special(special, mods),
            None => RawKey::noop(),
        };
    }

    let mut chars = rest.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let raw = RawKey::char(c, mods);
        return if raw.is_printable() { raw } else { RawKey::noop() };
    }

    match rest {
        "SPC" => RawKey::char(' ', mods),
        "ESC" => RawKey::special(SpecialKey::Escape, mods),
        "RET" => RawKey::special(SpecialKey::Return, mods),
        _ => RawKey::noop(),
    }
}

/// Strip one leading `C-`, `M-` or `S-`, leaving at least one character behind
fn split_modifier(s: &str) -> Option<(Modifiers, &str)> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[1] != b'-' {
        return None;
    }
    let modifier = match bytes[0] {
        b'C' => Modifiers::CTRL,
        b'M' => Modifiers::ALT,
        b'S' => Modifiers::SHIFT,
        _ => return None,
    };
    Some((modifier, &s[2..]))
}

fn bracketed_key(name: &str) -> Option<SpecialKey> {
    if let Some(number) = name.strip_prefix('f').or_else(|| name.strip_prefix('F')) {
        return match number.parse::<u8>() {
            Ok(n) if (1..=24).contains(&n) => Some(SpecialKey::F(n)),
            _ => None,
        };
    }

    let key = match name {
        "right" => SpecialKey::Right,
        "left" => SpecialKey::Left,
        "up" => SpecialKey::Up,
        "down" => SpecialKey::Down,
        "prior" => SpecialKey::PageUp,
        "next" => SpecialKey::PageDown,
        "end" => SpecialKey::End,
        "home" => SpecialKey::Home,
        "tab" => SpecialKey::Tab,
        "backspace" => SpecialKey::Backspace,
        "print" => SpecialKey::PrintScreen,
        "insert" => SpecialKey::Insert,
        "pause" => SpecialKey::Pause,
        "delete" => SpecialKey::Delete,
        _ => return None,
    };
    Some(key)
}

/// True when the token's base key is an ASCII digit, whatever the modifiers
pub fn is_digit_key(token: &str) -> bool {
    raw_from_token(token).is_digit()
}

/// True for control+digit tokens (`C-4`, `C-M-4`), which start a prefix argument
pub fn is_digit_argument_key(token: &str) -> bool {
    let raw = raw_from_token(token);
    raw.mods.ctrl() && raw.is_digit()
}

/// The digit carried by a digit token (`"7"`, `"C-7"`, `"M-7"` all give 7)
pub fn digit_value(token: &str) -> Option<u32> {
    let raw = raw_from_token(token);
    if raw.is_digit() {
        raw.char_code.and_then(|c| c.to_digit(10))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(c: char) -> RawKey {
        RawKey::char(c, Modifiers::NONE)
    }

    #[test]
    fn test_printable_maps_to_literal() {
        assert_eq!(token_from_raw(&plain('a')), "a");
        assert_eq!(token_from_raw(&plain('A')), "A");
        assert_eq!(token_from_raw(&plain('~')), "~");
        assert_eq!(token_from_raw(&plain(' ')), "SPC");
    }

    #[test]
    fn test_shift_ignored_for_printable() {
        let raw = RawKey::char('A', Modifiers::SHIFT);
        assert_eq!(token_from_raw(&raw), "A");
    }

    #[test]
    fn test_modifier_order() {
        let raw = RawKey::char('-', Modifiers::CTRL | Modifiers::ALT);
        assert_eq!(token_from_raw(&raw), "C-M--");

        let raw = RawKey::special(
            SpecialKey::Left,
            Modifiers::CTRL | Modifiers::SHIFT | Modifiers::META,
        );
        assert_eq!(token_from_raw(&raw), "S-C-M-<left>");

        let raw = RawKey::special(SpecialKey::Return, Modifiers::ALT);
        assert_eq!(token_from_raw(&raw), "M-RET");
    }

    #[test]
    fn test_special_table() {
        let cases = [
            (SpecialKey::Escape, "ESC"),
            (SpecialKey::Return, "RET"),
            (SpecialKey::Enter, "RET"),
            (SpecialKey::Left, "<left>"),
            (SpecialKey::Right, "<right>"),
            (SpecialKey::Up, "<up>"),
            (SpecialKey::Down, "<down>"),
            (SpecialKey::PageUp, "<prior>"),
            (SpecialKey::PageDown, "<next>"),
            (SpecialKey::Home, "<home>"),
            (SpecialKey::End, "<end>"),
            (SpecialKey::Tab, "<tab>"),
            (SpecialKey::Backspace, "<backspace>"),
            (SpecialKey::PrintScreen, "<print>"),
            (SpecialKey::Insert, "<insert>"),
            (SpecialKey::Pause, "<pause>"),
            (SpecialKey::Delete, "<delete>"),
        ];
        for (key, expected) in cases {
            assert_eq!(
                token_from_raw(&RawKey::special(key, Modifiers::NONE)),
                expected,
                "{key:?}"
            );
        }
    }

    #[test]
    fn test_function_keys() {
        for n in 1..=24u8 {
            let token = token_from_raw(&RawKey::special(SpecialKey::F(n), Modifiers::NONE));
            assert_eq!(token.as_str(), format!("<f{n}>"));
        }
        assert!(token_from_raw(&RawKey::special(SpecialKey::F(25), Modifiers::NONE)).is_empty());
        assert!(token_from_raw(&RawKey::special(SpecialKey::F(0), Modifiers::NONE)).is_empty());
    }

    #[test]
    fn test_unmapped_is_empty() {
        let raw = RawKey::special(SpecialKey::Unidentified(0x91), Modifiers::CTRL);
        assert!(token_from_raw(&raw).is_empty());
        assert!(token_from_raw(&RawKey::noop()).is_empty());
        assert!(token_from_raw(&plain('é')).is_empty());
    }

    #[test]
    fn test_ctrl_underscore_quirk() {
        let raw = RawKey::special(SpecialKey::Oem102, Modifiers::CTRL);
        assert_eq!(token_from_raw(&raw), "C-_");
        let raw = RawKey::special(SpecialKey::Oem102, Modifiers::NONE);
        assert!(token_from_raw(&raw).is_empty());
    }

    #[test]
    fn test_inverse_parses_modifiers() {
        let raw = raw_from_token("C-M-x");
        assert_eq!(raw.char_code, Some('x'));
        assert!(raw.mods.ctrl());
        assert!(raw.mods.alt());

        let raw = raw_from_token("M--");
        assert_eq!(raw.char_code, Some('-'));
        assert!(raw.mods.alt());

        let raw = raw_from_token("S-<tab>");
        assert_eq!(raw.special, Some(SpecialKey::Tab));
        assert!(raw.mods.shift());
    }

    #[test]
    fn test_inverse_unparseable_is_noop() {
        for token in ["", "<f25>", "<nope>", "foo", "C-", "<f>"] {
            assert_eq!(raw_from_token(token), RawKey::noop(), "{token:?}");
            assert!(token_from_raw(&raw_from_token(token)).is_empty());
        }
    }

    /// Enter and Return both name `RET`; the inverse always yields Return, so
    /// only the token (not the descriptor) survives a round trip. Function keys
    /// beyond F24 have no token and are excluded.
    #[test]
    fn test_round_trip_law() {
        let raws = [
            plain('a'),
            plain('Z'),
            plain('5'),
            plain(' '),
            plain('-'),
            plain('_'),
            RawKey::char('x', Modifiers::CTRL),
            RawKey::char('x', Modifiers::CTRL | Modifiers::ALT),
            RawKey::char('-', Modifiers::META),
            RawKey::char('9', Modifiers::CTRL),
            RawKey::char(' ', Modifiers::CTRL),
            RawKey::special(SpecialKey::Enter, Modifiers::ALT),
            RawKey::special(SpecialKey::Escape, Modifiers::NONE),
            RawKey::special(SpecialKey::F(2), Modifiers::SHIFT),
            RawKey::special(SpecialKey::F(24), Modifiers::CTRL),
            RawKey::special(SpecialKey::PageDown, Modifiers::CTRL | Modifiers::SHIFT),
            RawKey::special(SpecialKey::Delete, Modifiers::NONE),
            RawKey::special(SpecialKey::Oem102, Modifiers::CTRL),
        ];
        for raw in raws {
            let token = token_from_raw(&raw);
            assert!(!token.is_empty(), "{raw:?}");
            let again = token_from_raw(&raw_from_token(&token));
            assert_eq!(again, token, "{raw:?}");
        }
    }

    #[test]
    fn test_digit_helpers() {
        assert!(is_digit_key("7"));
        assert!(is_digit_key("C-7"));
        assert!(is_digit_key("M-7"));
        assert!(!is_digit_key("a"));

        assert!(is_digit_argument_key("C-7"));
        assert!(is_digit_argument_key("C-M-0"));
        assert!(!is_digit_argument_key("M-7"));
        assert!(!is_digit_argument_key("7"));

        assert_eq!(digit_value("C-9"), Some(9));
        assert_eq!(digit_value("3"), Some(3));
        assert_eq!(digit_value("-"), None);
    }
}
