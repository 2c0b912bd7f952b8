//! `.properties` line parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ logical_lines()  → Vec<(line number, String)>
//!          └─ parse_entry() → (key, value)

use std::{iter::Peekable, str::Chars};

use crate::error::{Error, Result};

// ─── Logical lines ───────────────────────────────────────────────────────────

/// An odd number of trailing backslashes continues the line.
fn is_continued(line: &str) -> bool {
  line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn is_blank_or_comment(line: &str) -> bool {
  line.is_empty() || line.starts_with(['#', '!'])
}

/// Join continuation lines and drop blanks and comments.
///
/// Each logical line carries the 1-based number of its first physical line.
/// Leading whitespace of every physical line is dropped.
pub(crate) fn logical_lines(input: &str) -> Vec<(usize, String)> {
  let mut lines = Vec::new();
  let mut pending: Option<(usize, String)> = None;

  for (idx, raw) in input.lines().enumerate() {
    let trimmed = raw.trim_start();
    let (start, mut text) = match pending.take() {
      Some((start, mut acc)) => {
        acc.push_str(trimmed);
        (start, acc)
      }
      None if is_blank_or_comment(trimmed) => continue,
      None => (idx + 1, trimmed.to_string()),
    };

    if is_continued(&text) {
      text.pop();
      pending = Some((start, text));
    } else {
      lines.push((start, text));
    }
  }

  // Continuation on the last line of the input: keep what we have.
  if let Some(last) = pending {
    lines.push(last);
  }
  lines
}

// ─── Escapes ─────────────────────────────────────────────────────────────────

fn hex4(chars: &mut Peekable<Chars<'_>>, line: usize) -> Result<u32> {
  let digits: String = chars.by_ref().take(4).collect();
  if digits.len() != 4 {
    return Err(Error::InvalidEscape {
      line,
      detail: format!("truncated \\u escape {digits:?}"),
    });
  }
  u32::from_str_radix(&digits, 16).map_err(|_| Error::InvalidEscape {
    line,
    detail: format!("non-hex \\u escape {digits:?}"),
  })
}

/// Decode the escape following a backslash.
fn unescape(chars: &mut Peekable<Chars<'_>>, line: usize) -> Result<char> {
  let c = match chars.next() {
    Some('t') => '\t',
    Some('n') => '\n',
    Some('r') => '\r',
    Some('f') => '\u{0c}',
    Some('u') => return unicode_escape(chars, line),
    Some(other) => other,
    None => {
      return Err(Error::InvalidEscape {
        line,
        detail: "dangling backslash".to_string(),
      });
    }
  };
  Ok(c)
}

/// `\uXXXX`, including a `\uD8xx\uDCxx` surrogate pair.
fn unicode_escape(chars: &mut Peekable<Chars<'_>>, line: usize) -> Result<char> {
  let high = hex4(chars, line)?;
  if !(0xD800..0xDC00).contains(&high) {
    return char::from_u32(high).ok_or_else(|| Error::InvalidEscape {
      line,
      detail: format!("unpaired surrogate \\u{high:04X}"),
    });
  }

  let unpaired = || Error::InvalidEscape {
    line,
    detail: format!("unpaired surrogate \\u{high:04X}"),
  };
  if chars.next() != Some('\\') || chars.next() != Some('u') {
    return Err(unpaired());
  }
  let low = hex4(chars, line)?;
  if !(0xDC00..0xE000).contains(&low) {
    return Err(unpaired());
  }
  let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
  char::from_u32(code).ok_or_else(unpaired)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
  while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// Split one logical line into key and value.
///
/// The key ends at the first unescaped `=`, `:` or whitespace. Whitespace
/// around the separator is skipped; the value runs to the end of the line.
pub(crate) fn parse_entry(line: usize, text: &str) -> Result<(String, String)> {
  let mut chars = text.chars().peekable();

  let mut key = String::new();
  let mut separated = false;
  while let Some(c) = chars.next() {
    match c {
      '\\' => key.push(unescape(&mut chars, line)?),
      '=' | ':' => {
        separated = true;
        break;
      }
      c if c.is_whitespace() => break,
      c => key.push(c),
    }
  }

  skip_whitespace(&mut chars);
  if !separated && chars.next_if(|c| matches!(c, '=' | ':')).is_some() {
    skip_whitespace(&mut chars);
  }

  let mut value = String::new();
  while let Some(c) = chars.next() {
    match c {
      '\\' => value.push(unescape(&mut chars, line)?),
      c => value.push(c),
    }
  }

  Ok((key, value))
}

/// Parse a whole document into entries, in file order.
pub(crate) fn parse_entries(input: &str) -> Result<Vec<(String, String)>> {
  logical_lines(input)
    .into_iter()
    .map(|(line, text)| parse_entry(line, &text))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn one(input: &str) -> (String, String) {
    let mut entries = parse_entries(input).unwrap();
    assert_eq!(entries.len(), 1, "{entries:?}");
    entries.remove(0)
  }

  fn pair(k: &str, v: &str) -> (String, String) { (k.to_string(), v.to_string()) }

  #[test]
  fn all_three_separators() {
    assert_eq!(one("greeting=Hi"), pair("greeting", "Hi"));
    assert_eq!(one("greeting: Hi"), pair("greeting", "Hi"));
    assert_eq!(one("greeting   Hi there"), pair("greeting", "Hi there"));
    assert_eq!(one("greeting = = Hi"), pair("greeting", "= Hi"));
  }

  #[test]
  fn comments_and_blanks_are_skipped() {
    let input = "# comment\n! also comment\n\n   \na=1\n";
    assert_eq!(parse_entries(input).unwrap(), vec![pair("a", "1")]);
  }

  #[test]
  fn key_without_value() {
    assert_eq!(one("lonely"), pair("lonely", ""));
    assert_eq!(one("lonely="), pair("lonely", ""));
  }

  #[test]
  fn continuation_lines_are_joined() {
    let input = "title = Dash\\\n        board\nnext=x";
    let entries = parse_entries(input).unwrap();
    assert_eq!(entries, vec![pair("title", "Dashboard"), pair("next", "x")]);
  }

  #[test]
  fn even_backslashes_do_not_continue() {
    let entries = parse_entries("path=C:\\\\\nnext=x").unwrap();
    assert_eq!(entries, vec![pair("path", "C:\\"), pair("next", "x")]);
  }

  #[test]
  fn comment_ending_in_backslash_does_not_continue() {
    let entries = parse_entries("# note \\\na=1").unwrap();
    assert_eq!(entries, vec![pair("a", "1")]);
  }

  #[test]
  fn escapes_in_key_and_value() {
    assert_eq!(one("my\\ key\\=x = tab\\there\\nnew"), pair("my key=x", "tab\there\nnew"));
  }

  #[test]
  fn unicode_escapes() {
    assert_eq!(one("k=\\u00dcbersicht"), pair("k", "Übersicht"));
    assert_eq!(one("k=\\uD83D\\uDE00"), pair("k", "😀"));
  }

  #[test]
  fn bad_unicode_escape_reports_line() {
    let err = parse_entries("a=1\nb=\\u12G4").unwrap_err();
    assert!(matches!(err, Error::InvalidEscape { line: 2, .. }), "{err}");
  }

  #[test]
  fn lone_surrogate_is_rejected() {
    assert!(parse_entries("k=\\uD83Dx").is_err());
  }

  #[test]
  fn crlf_input() {
    let entries = parse_entries("a=1\r\nb=2\r\n").unwrap();
    assert_eq!(entries, vec![pair("a", "1"), pair("b", "2")]);
  }
}
