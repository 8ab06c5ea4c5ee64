// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Textual notation for automata
//!
//! An automaton is described by a list of states and transitions separated by whitespace:
//! - a state is written as its label, optionally preceded by `}` if it's the
//!   initial state and by `*` if it's a final state
//! - a transition is written `p -a-> q` or `p -a,b,c-> q` where p and q are
//!   states and a, b, c are symbols (single characters)
//! - transitions can be chained: `p -a-> q -b-> r`
//! - symbols that label no transition can be added to the alphabet by a
//!   declaration `{a,b,c}`
//!
//! Whitespace around arrows and commas is ignored. Exactly one state must be
//! marked initial. A state can be marked more than once.
//!
//! ```
//! use rlsm::dfa_notation::parse;
//!
//! let dfa = parse("}s1 -a,b-> *s2 s2 -b-> s1").unwrap();
//! assert_eq!(dfa.num_states(), 2);
//! assert_eq!(dfa.final_states(), vec!["s2"]);
//! ```
//!

use crate::{
    automata::{Dfa, DfaBuilder},
    errors::DfaError,
};

#[derive(Debug, PartialEq, Eq)]
enum Token {
    State {
        label: String,
        initial: bool,
        is_final: bool,
    },
    Arrow(Vec<char>),
    Alphabet(Vec<char>),
}

fn syntax_error(offset: usize, message: &str) -> DfaError {
    DfaError::Syntax {
        offset,
        message: message.to_string(),
    }
}

fn is_label_char(c: char) -> bool {
    !c.is_whitespace() && !"-{}*,>".contains(c)
}

// split a comma-separated list of symbols
fn symbol_list(text: &str, offset: usize) -> Result<Vec<char>, DfaError> {
    let mut labels = Vec::new();
    for part in text.split(',') {
        let part = part.trim();
        let mut chars = part.chars();
        match (chars.next(), chars.next()) {
            (None, _) => return Err(syntax_error(offset, "empty symbol")),
            (Some(c), None) => labels.push(c),
            _ => {
                return Err(syntax_error(
                    offset,
                    "symbols must be single characters separated by commas",
                ))
            }
        }
    }
    Ok(labels)
}

fn tokenize(description: &str) -> Result<Vec<(usize, Token)>, DfaError> {
    let chars: Vec<(usize, char)> = description.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (offset, c) = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '-' {
            // arrow: '-' labels '-' '>'
            let start = i + 1;
            let mut j = start;
            while j < chars.len() && chars[j].1 != '-' {
                j += 1;
            }
            if j == chars.len() {
                return Err(syntax_error(offset, "unterminated transition"));
            }
            if j + 1 >= chars.len() || chars[j + 1].1 != '>' {
                return Err(syntax_error(chars[j].0, "expected '->'"));
            }
            let text: String = chars[start..j].iter().map(|&(_, c)| c).collect();
            tokens.push((offset, Token::Arrow(symbol_list(&text, offset)?)));
            i = j + 2;
        } else if c == '{' {
            // alphabet declaration: '{' symbols '}'
            let start = i + 1;
            let mut j = start;
            while j < chars.len() && chars[j].1 != '}' {
                j += 1;
            }
            if j == chars.len() {
                return Err(syntax_error(offset, "unterminated alphabet"));
            }
            let text: String = chars[start..j].iter().map(|&(_, c)| c).collect();
            let symbols = if text.trim().is_empty() {
                Vec::new()
            } else {
                symbol_list(&text, offset)?
            };
            tokens.push((offset, Token::Alphabet(symbols)));
            i = j + 1;
        } else {
            let mut initial = false;
            let mut is_final = false;
            while i < chars.len() && (chars[i].1 == '}' || chars[i].1 == '*') {
                if chars[i].1 == '}' {
                    initial = true;
                } else {
                    is_final = true;
                }
                i += 1;
            }
            let start = i;
            while i < chars.len() && is_label_char(chars[i].1) {
                i += 1;
            }
            if start == i {
                let at = chars.get(i).map_or(description.len(), |&(o, _)| o);
                return Err(syntax_error(at, "expected a state name"));
            }
            if let Some(&(o, c)) = chars.get(i) {
                if !c.is_whitespace() && c != '-' {
                    return Err(syntax_error(o, &format!("unexpected character '{c}'")));
                }
            }
            let label: String = chars[start..i].iter().map(|&(_, c)| c).collect();
            tokens.push((
                offset,
                Token::State {
                    label,
                    initial,
                    is_final,
                },
            ));
        }
    }
    Ok(tokens)
}

///
/// Parse an automaton description
///
/// # Errors
///
/// - [DfaError::Syntax] if the description is malformed
/// - [DfaError::NoInitialState] or [DfaError::MultipleInitialStates] if
///   the number of initial states is not one
/// - [DfaError::NonDeterministicTransition] if two transitions from the same state
///   have the same symbol but different targets
/// - [DfaError::ReservedTrapName] if a state is labeled `trap`
///
pub fn parse(description: &str) -> Result<Dfa, DfaError> {
    let mut builder = DfaBuilder::new();
    // source of the next transition and pending arrow
    let mut source: Option<String> = None;
    let mut arrow: Option<(usize, Vec<char>)> = None;

    for (offset, token) in tokenize(description)? {
        match token {
            Token::State {
                label,
                initial,
                is_final,
            } => {
                builder.add_state(&label)?;
                if initial {
                    builder.mark_initial(&label)?;
                }
                if is_final {
                    builder.mark_final(&label)?;
                }
                if let Some((_, symbols)) = arrow.take() {
                    if let Some(s) = &source {
                        for c in symbols {
                            builder.add_transition(s, c, &label)?;
                        }
                    }
                }
                source = Some(label);
            }
            Token::Arrow(symbols) => {
                if arrow.is_some() {
                    return Err(syntax_error(offset, "a transition must end with a state"));
                }
                if source.is_none() {
                    return Err(syntax_error(offset, "a transition must start with a state"));
                }
                arrow = Some((offset, symbols));
            }
            Token::Alphabet(symbols) => {
                if arrow.is_some() {
                    return Err(syntax_error(offset, "a transition must end with a state"));
                }
                for c in symbols {
                    builder.add_symbol(c);
                }
            }
        }
    }
    if let Some((offset, _)) = arrow {
        return Err(syntax_error(offset, "a transition must end with a state"));
    }
    builder.build()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tokens() {
        let tokens = tokenize(" }s1 -a, b-> *s2  ").unwrap();
        println!("{tokens:?}");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], (5, Token::Arrow(vec!['a', 'b'])));
        assert_eq!(
            tokens[2].1,
            Token::State {
                label: "s2".to_string(),
                initial: false,
                is_final: true
            }
        );
    }

    #[test]
    fn test_parse() {
        let dfa = parse("}s1-a->*s2 s2-b->s1").unwrap();
        assert_eq!(dfa.state_labels(), vec!["s1", "s2"]);
        assert_eq!(dfa.initial_state(), "s1");
        assert_eq!(dfa.final_states(), vec!["s2"]);
        assert_eq!(dfa.alphabet(), &['a', 'b']);
        assert_eq!(dfa.transitions(), vec![("s1", "s2", 'a'), ("s2", "s1", 'b')]);

        let dfa = parse(" }s1 -a, b-> *s2  ").unwrap();
        assert_eq!(dfa.transitions(), vec![("s1", "s2", 'a'), ("s1", "s2", 'b')]);

        let dfa = parse("}*s1").unwrap();
        assert_eq!(dfa.final_states(), vec!["s1"]);
        let dfa = parse("*}s1").unwrap();
        assert_eq!(dfa.initial_state(), "s1");
        assert_eq!(dfa.final_states(), vec!["s1"]);

        let dfa = parse("}s1 s2").unwrap();
        assert_eq!(dfa.num_states(), 2);
        assert!(dfa.alphabet().is_empty());

        // chains and repeated markers
        let dfa = parse("}p -a-> q -b-> *r }p -c-> *r").unwrap();
        assert_eq!(dfa.num_states(), 3);
        assert!(dfa.accepts("ab"));
        assert!(dfa.accepts("c"));

        // duplicate transitions are allowed
        let dfa = parse("}p-a->q p-a->q").unwrap();
        assert_eq!(dfa.transitions().len(), 1);
    }

    #[test]
    fn test_alphabet_declaration() {
        let dfa = parse("{a,b, c} }*p p-a->p").unwrap();
        assert_eq!(dfa.alphabet(), &['a', 'b', 'c']);
        assert_eq!(dfa.transitions(), vec![("p", "p", 'a')]);
        assert!(!dfa.is_complete());

        // the declaration can appear anywhere between states
        let dfa = parse("}p-a->q {z} *q {}").unwrap();
        assert_eq!(dfa.alphabet(), &['a', 'z']);

        for bad in ["{a,b", "{ab} }p", "{a,} }p", "}p -a-> {b} q"] {
            let err = parse(bad);
            println!("{bad:?}: {err:?}");
            assert!(matches!(err, Err(DfaError::Syntax { .. })));
        }
    }

    #[test]
    fn test_errors() {
        for bad in [
            "}s1 a-> s2",
            "}s1 -a> s2",
            "}s1 -a- s2",
            "}s1 --> s2",
            "}s1 -a;b-> s2",
            " -a-> }s2",
            "}s1 -a-> ",
            "}s1 -a-> -b-> s2",
            "}s1, s2",
            "}",
        ] {
            let err = parse(bad);
            println!("{bad:?}: {err:?}");
            assert!(matches!(err, Err(DfaError::Syntax { .. })));
        }

        assert_eq!(parse("").unwrap_err(), DfaError::NoInitialState);
        assert_eq!(parse("s1 -a-> *s2").unwrap_err(), DfaError::NoInitialState);
        assert!(matches!(
            parse("}s1-a->}s2"),
            Err(DfaError::MultipleInitialStates(_, _))
        ));
        assert!(matches!(
            parse("}s1-a->s2 s1-a->s3"),
            Err(DfaError::NonDeterministicTransition { .. })
        ));
        assert_eq!(
            parse("}s1-a->trap").unwrap_err(),
            DfaError::ReservedTrapName("trap".to_string())
        );
    }
}
