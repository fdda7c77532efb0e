use crate::utils::error::{BookError, Isbn10Reason, Result};

const ISBN10_LEN: usize = 10;
const ISBN10_MODULUS: u32 = 11;

fn significant_chars(value: &str) -> Vec<char> {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, 'X' | 'x'))
        .collect()
}

fn digit_value(c: char) -> u32 {
    match c {
        'X' | 'x' => 10,
        _ => c.to_digit(10).unwrap_or(0),
    }
}

/// Weighted sum of an ISBN-10 (weights 10 down to 1), or `None` when the
/// value does not have exactly ten significant characters.
pub fn isbn10_weighted_sum(value: &str) -> Option<u32> {
    let chars = significant_chars(value);
    if chars.len() != ISBN10_LEN {
        return None;
    }

    Some(
        chars
            .iter()
            .enumerate()
            .map(|(i, &c)| (ISBN10_LEN - i) as u32 * digit_value(c))
            .sum(),
    )
}

/// Validates an ISBN-10 and hands back the value exactly as given.
///
/// Hyphens, spaces and any other characters outside `0-9Xx` are ignored.
/// The position of `X` is not checked.
pub fn validate_isbn10(value: &str) -> Result<&str> {
    let found = significant_chars(value).len();
    let sum = isbn10_weighted_sum(value).ok_or_else(|| BookError::Isbn10Format {
        value: value.to_string(),
        reason: Isbn10Reason::Length { found },
    })?;

    if sum % ISBN10_MODULUS != 0 {
        return Err(BookError::Isbn10Format {
            value: value.to_string(),
            reason: Isbn10Reason::Checksum { sum },
        });
    }

    Ok(value)
}
