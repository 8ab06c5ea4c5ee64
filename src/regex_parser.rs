// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Parser for regular expressions
//!
//! Syntax:
//! - any character other than `( ) | * & @` and whitespace is a symbol
//! - `&` and `@` denote the empty word
//! - `|` is union, `*` is the Kleene star, juxtaposition is concatenation
//! - the empty string denotes the empty set. So does any input made only of
//!   parentheses and stars, such as `()` or `(())*`.
//! - an empty branch of a union denotes the empty set, as in `(|a)`. Stars
//!   at the start of a branch apply to that empty branch and are dropped.
//!
//! Whitespace is ignored. Precedence is as usual: star binds tighter than
//! concatenation, which binds tighter than union.
//!

use crate::{errors::RegexError, regular_expressions::Regex};

const FORBIDDEN: [&str; 3] = ["()", "(*", "|)"];

/// Check whether c can be used as a symbol
pub(crate) fn is_symbol(c: char) -> bool {
    !c.is_whitespace() && !c.is_control() && !"()|*&@".contains(c)
}

fn check_balanced(s: &[char]) -> Result<(), RegexError> {
    let mut depth: usize = 0;
    for &c in s {
        if c == '(' {
            depth += 1;
        } else if c == ')' {
            depth = depth.checked_sub(1).ok_or(RegexError::UnbalancedParentheses)?;
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(RegexError::UnbalancedParentheses)
    }
}

fn check_sequences(s: &[char]) -> Result<(), RegexError> {
    for w in s.windows(2) {
        let pair: String = w.iter().collect();
        if FORBIDDEN.contains(&pair.as_str()) {
            return Err(RegexError::InvalidSequence(pair));
        }
    }
    Ok(())
}

//
// Collapse `**` and `&&` into one character, and `&*` into `&`
//
fn squeeze(s: Vec<char>) -> Vec<char> {
    let mut result: Vec<char> = Vec::with_capacity(s.len());
    for c in s {
        match (result.last(), c) {
            (Some('*'), '*') | (Some('&'), '&') | (Some('&'), '*') => (),
            _ => result.push(c),
        }
    }
    result
}

//
// Preprocessing: remove whitespace, replace '@' by '&', check the input
// - return None if the input denotes the empty set
//
fn preprocess(input: &str) -> Result<Option<Vec<char>>, RegexError> {
    let mut s = Vec::with_capacity(input.len());
    for c in input.chars() {
        if c.is_whitespace() {
            continue;
        }
        if c.is_control() {
            return Err(RegexError::InvalidSymbol(c));
        }
        s.push(if c == '@' { '&' } else { c });
    }
    check_balanced(&s)?;
    if s.first() == Some(&'*') {
        return Err(RegexError::InvalidSequence("*".to_string()));
    }
    if s.iter().all(|&c| c == '(' || c == ')' || c == '*') {
        return Ok(None);
    }
    check_sequences(&s)?;
    Ok(Some(squeeze(s)))
}

// index of the parenthesis that closes the one at index i
fn matching_paren(s: &[char], i: usize) -> Option<usize> {
    let mut depth = 0;
    for (j, &c) in s.iter().enumerate().skip(i) {
        if c == '(' {
            depth += 1;
        } else if c == ')' {
            depth -= 1;
            if depth == 0 {
                return Some(j);
            }
        }
    }
    None
}

// remove surrounding parentheses: (((ab))) -> ab
fn trim_parens(mut s: &[char]) -> &[char] {
    while s.len() >= 2 && s[0] == '(' && matching_paren(s, 0) == Some(s.len() - 1) {
        s = &s[1..s.len() - 1];
    }
    s
}

// split at the '|' of depth 0
fn split_union(s: &[char]) -> Vec<&[char]> {
    let mut parts = Vec::new();
    let mut depth = 0;
    let mut start = 0;
    for (i, &c) in s.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '|' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => (),
        }
    }
    parts.push(&s[start..]);
    parts
}

//
// Parse a balanced, preprocessed expression
// - an empty branch of a union denotes the empty set
//
fn parse_expr(s: &[char]) -> Result<Regex, RegexError> {
    let s = trim_parens(s);
    let branches = split_union(s);
    if branches.len() > 1 {
        let branches = branches
            .into_iter()
            .map(parse_expr)
            .collect::<Result<Vec<Regex>, RegexError>>()?;
        return Ok(Regex::union_of(branches));
    }

    let mut i = s.iter().take_while(|&&c| c == '*').count();
    if i == s.len() {
        return Ok(Regex::empty_set());
    }

    // concatenation of factors: an atom followed by optional stars
    let mut factors = Vec::new();
    while i < s.len() {
        let mut factor = match s[i] {
            '(' => {
                let j = matching_paren(s, i).ok_or(RegexError::UnbalancedParentheses)?;
                let inner = parse_expr(&s[i + 1..j])?;
                i = j + 1;
                inner
            }
            '&' => {
                i += 1;
                Regex::empty_word()
            }
            ')' => return Err(RegexError::UnbalancedParentheses),
            c if is_symbol(c) => {
                i += 1;
                Regex::prim(c)
            }
            c => return Err(RegexError::InvalidSequence(c.to_string())),
        };
        while i < s.len() && s[i] == '*' {
            factor = factor.star();
            i += 1;
        }
        factors.push(factor);
    }
    Ok(Regex::concat_of(factors))
}

///
/// Parse a regular expression
///
pub(crate) fn parse(input: &str) -> Result<Regex, RegexError> {
    match preprocess(input)? {
        None => Ok(Regex::empty_set()),
        Some(s) => parse_expr(&s),
    }
}
