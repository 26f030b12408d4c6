//! Natural ("human") ordering of file names.
//!
//! `img2.png` sorts before `img10.png` because embedded digit runs compare as
//! numbers. The comparator is total: every pair of strings has a defined,
//! antisymmetric order, so sorting never needs a fallback.

use std::cmp::Ordering;

/// One run of a name: either consecutive ASCII digits or everything between them.
#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

/// Split `s` into alternating digit / non-digit runs.
fn chunks(s: &str) -> impl Iterator<Item = Chunk<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_digit = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|&(_, c)| c.is_ascii_digit() != is_digit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        rest = tail;
        Some(if is_digit {
            Chunk::Digits(head)
        } else {
            Chunk::Text(head)
        })
    })
}

/// Compare two digit runs by numeric value without parsing, so arbitrarily
/// long runs cannot overflow.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn cmp_chunk(a: &Chunk<'_>, b: &Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
        (Chunk::Text(x), Chunk::Text(y)) => cmp_text(x, y),
        // Digits sort before letters, mirroring their ASCII order.
        (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
        (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
    }
}

/// Natural-order comparison of two names.
///
/// Names that are equal under natural ordering (`img01` / `img1`, `A` / `a`)
/// are tie-broken on their raw bytes so the result is only `Equal` for
/// identical strings.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match cmp_chunk(&x, &y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}
