//! Prefix-argument parsing
//!
//! Examples, with the default special keys:
//!
//! ```text
//! C-u            =>    4
//! C-u C-u C-u    =>   64
//! C-u 1 2        =>   12
//! C-u -          =>   -1
//! M-- 2 1 3      => -213
//! C-9 2          =>   92
//! ```

use crate::config::SpecialKeys;
use crate::keymap::{digit_value, Token};

/// Parse the tokens collected while reading a prefix argument
///
/// Returns `None` for an empty sequence. Tokens that are not digits where
/// digits are expected are skipped.
pub fn parse_prefix_argument(keys: &[Token], special: &SpecialKeys) -> Option<i64> {
    let first = keys.first()?;

    if special.is_universal_argument(first) {
        let repeats = keys
            .iter()
            .take_while(|k| special.is_universal_argument(k))
            .count();
        let rest = &keys[repeats..];

        if rest.is_empty() {
            let exponent = u32::try_from(repeats).unwrap_or(u32::MAX);
            return Some(4_i64.saturating_pow(exponent));
        }
        if rest[0] == "-" {
            return Some(-magnitude(&rest[1..]).unwrap_or(1));
        }
        return Some(magnitude(rest).unwrap_or(0));
    }

    if special.is_negative_argument(first) {
        return Some(-magnitude(&keys[1..]).unwrap_or(1));
    }

    // control+digit: the trigger's own digit leads
    Some(magnitude(keys).unwrap_or(0))
}

/// Concatenate digit tokens in typed order, first digit most significant
fn magnitude(keys: &[Token]) -> Option<i64> {
    keys.iter()
        .filter_map(|k| digit_value(k))
        .fold(None, |acc, d| {
            Some(acc.unwrap_or(0_i64).saturating_mul(10).saturating_add(i64::from(d)))
        })
}
