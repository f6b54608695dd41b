//! Natural, null-aware ordering for series position strings.
//!
//! Positions are free-form text ("1", "2.5", "Book 10"), so plain
//! lexicographic order puts "10" before "2". This comparator splits a
//! position into digit and non-digit runs: digit runs compare by value,
//! the rest case-insensitively. Missing and empty positions sort
//! strictly after every real one.

use std::cmp::Ordering;

/// Total order over optional sequence strings, nulls last
pub fn compare_sequences(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.filter(|s| !s.is_empty());
    let b = b.filter(|s| !s.is_empty());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => natural_cmp(a, b),
    }
}

#[derive(Debug, PartialEq)]
enum Chunk<'a> {
    Number(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let is_digit = rest.chars().next().is_some_and(|c| c.is_ascii_digit());
        let split = rest
            .find(|c: char| c.is_ascii_digit() != is_digit)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(split);
        out.push(if is_digit {
            Chunk::Number(chunk)
        } else {
            Chunk::Text(chunk)
        });
        rest = tail;
    }
    out
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let av = chunks(a);
    let bv = chunks(b);
    for pair in av.iter().zip(bv.iter()) {
        let ord = match pair {
            (Chunk::Number(x), Chunk::Number(y)) => number_cmp(x, y),
            (Chunk::Text(x), Chunk::Text(y)) => {
                x.to_lowercase().cmp(&y.to_lowercase())
            }
            // numbers sort before text
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    // shared prefix equal: shorter first, then exact text for determinism
    av.len().cmp(&bv.len()).then_with(|| a.cmp(b))
}

/// Compare two ASCII digit runs by value without parsing (runs can
/// exceed any integer width)
fn number_cmp(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
