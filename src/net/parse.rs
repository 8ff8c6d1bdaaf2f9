//! Reader for the Tina-style `.net` textual interchange format.
//!
//! Supported subset of the grammar:
//!
//! ```text
//! .net    ::= (<trdesc> | <pldesc> | <netdesc>)*
//! netdesc ::= 'net' <net>
//! trdesc  ::= 'tr' <transition> {':' <label>} {<interval>} {<input>* '->' <output>*}
//! pldesc  ::= 'pl' <place> {':' <label>} {'(' <marking> ')'}
//! interval ::= '[' INT ',' INT ']' | '[' INT ',' 'w' '['
//! input, output ::= <place> {'*' <weight>}
//! weight, marking ::= INT {'K'|'M'|'G'|'T'|'P'|'E'}
//! ```
//!
//! Places referenced by arcs are created on first use with an empty marking,
//! as in the reference reader; a later `pl` line overrides the marking.
use std::fs;
use std::io;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::net::core::Net;
use crate::net::ids::{PlaceId, TransitionId};
use crate::net::structure::{Place, TimeBound, TimeInterval, Transition, Weight};

#[derive(Debug, Error)]
pub enum NetParseError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("line {line}: duplicate transition '{name}'")]
    DuplicateTransition { line: usize, name: String },
    #[error("line {line}: empty interval '{text}' ({eft} > {lft})")]
    EmptyInterval {
        line: usize,
        text: String,
        eft: i64,
        lft: i64,
    },
}

fn syntax(line: usize, message: impl Into<String>) -> NetParseError {
    NetParseError::Syntax {
        line,
        message: message.into(),
    }
}

struct Parser {
    net: Net,
    places: IndexMap<String, PlaceId>,
    transitions: IndexMap<String, TransitionId>,
}

impl Parser {
    fn new() -> Self {
        Self {
            net: Net::empty(),
            places: IndexMap::new(),
            transitions: IndexMap::new(),
        }
    }

    fn place(&mut self, name: &str) -> PlaceId {
        if let Some(&id) = self.places.get(name) {
            return id;
        }
        let id = self.net.add_place(Place::new(name, 0));
        self.places.insert(name.to_owned(), id);
        id
    }

    fn parse_line(&mut self, number: usize, line: &str) -> Result<(), NetParseError> {
        let line = match line.find('#') {
            Some(at) => &line[..at],
            None => line,
        };
        let mut tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.is_empty() {
            return Ok(());
        }
        match tokens.remove(0) {
            "net" => self.parse_net_desc(number, &tokens),
            "tr" => self.parse_transition(number, &tokens),
            "pl" => self.parse_place(number, &tokens),
            // Notes, labels and priorities do not affect the analysis.
            "nt" | "lb" | "pr" => Ok(()),
            other => Err(syntax(number, format!("unknown description '{}'", other))),
        }
    }

    fn parse_net_desc(&mut self, number: usize, tokens: &[&str]) -> Result<(), NetParseError> {
        match tokens {
            [name] => {
                self.net.name = Some(unquote(name).to_owned());
                Ok(())
            }
            _ => Err(syntax(number, "expected 'net <name>'")),
        }
    }

    fn parse_transition(&mut self, number: usize, tokens: &[&str]) -> Result<(), NetParseError> {
        let Some((&name, rest)) = tokens.split_first() else {
            return Err(syntax(number, "expected 'tr <transition> ...'"));
        };
        let name = unquote(name);
        if self.transitions.contains_key(name) {
            return Err(NetParseError::DuplicateTransition {
                line: number,
                name: name.to_owned(),
            });
        }

        let (label, rest) = split_label(rest);
        let (interval, rest) = match rest.first() {
            Some(token) if token.starts_with(['[', ']']) => {
                (parse_interval(number, token)?, &rest[1..])
            }
            _ => (TimeInterval::UNCONSTRAINED, rest),
        };

        let mut transition = Transition::with_interval(name, interval);
        transition.label = label.map(str::to_owned);
        let id = self.net.add_transition(transition);
        self.transitions.insert(name.to_owned(), id);

        if rest.is_empty() {
            return Ok(());
        }
        let arrow = rest
            .iter()
            .position(|&token| token == "->")
            .ok_or_else(|| syntax(number, "expected '->' between inputs and outputs"))?;
        for arc in &rest[..arrow] {
            let (place, weight) = parse_arc(number, arc)?;
            let place = self.place(place);
            self.net.add_input_arc(place, id, weight);
        }
        for arc in &rest[arrow + 1..] {
            let (place, weight) = parse_arc(number, arc)?;
            let place = self.place(place);
            self.net.add_output_arc(place, id, weight);
        }
        Ok(())
    }

    fn parse_place(&mut self, number: usize, tokens: &[&str]) -> Result<(), NetParseError> {
        let Some((&name, rest)) = tokens.split_first() else {
            return Err(syntax(number, "expected 'pl <place> ...'"));
        };
        let place = self.place(unquote(name));
        let (_, rest) = split_label(rest);
        match rest {
            [] => Ok(()),
            [marking] => {
                let marking = marking
                    .strip_prefix('(')
                    .and_then(|m| m.strip_suffix(')'))
                    .ok_or_else(|| syntax(number, "expected '(<marking>)'"))?;
                self.net.places[place].tokens = parse_value(number, marking)?;
                Ok(())
            }
            _ => Err(syntax(number, "arcs on 'pl' lines are not supported")),
        }
    }
}

/// Skip an optional `: <label>` prefix, returning the label when present.
fn split_label<'a>(tokens: &'a [&'a str]) -> (Option<&'a str>, &'a [&'a str]) {
    match tokens {
        [":", label, rest @ ..] => (Some(unquote(label)), rest),
        _ => (None, tokens),
    }
}

fn unquote(name: &str) -> &str {
    name.strip_prefix('{')
        .and_then(|n| n.strip_suffix('}'))
        .unwrap_or(name)
}

fn parse_arc(number: usize, token: &str) -> Result<(&str, Weight), NetParseError> {
    if token.contains(['?', '!']) {
        return Err(syntax(
            number,
            format!("unsupported arc kind in '{}'", token),
        ));
    }
    match token.split_once('*') {
        Some((place, weight)) => Ok((unquote(place), parse_value(number, weight)?)),
        None => Ok((unquote(token), 1)),
    }
}

fn parse_value(number: usize, text: &str) -> Result<Weight, NetParseError> {
    let (digits, multiplier) = match text.chars().last() {
        Some('K') => (&text[..text.len() - 1], 1_000),
        Some('M') => (&text[..text.len() - 1], 1_000_000),
        Some('G') => (&text[..text.len() - 1], 1_000_000_000),
        Some('T') => (&text[..text.len() - 1], 1_000_000_000_000),
        Some('P') => (&text[..text.len() - 1], 1_000_000_000_000_000),
        Some('E') => (&text[..text.len() - 1], 1_000_000_000_000_000_000),
        _ => (text, 1),
    };
    let value: Weight = digits
        .parse()
        .map_err(|_| syntax(number, format!("invalid integer '{}'", text)))?;
    Ok(value * multiplier)
}

fn parse_interval(number: usize, token: &str) -> Result<TimeInterval, NetParseError> {
    let err = || syntax(number, format!("invalid interval '{}'", token));
    // Open bounds (']a,b]' and the like) would need strict inequalities,
    // which the constraint graph does not carry.
    let body = token.strip_prefix('[').ok_or_else(|| {
        syntax(
            number,
            format!("open interval bounds are not supported in '{}'", token),
        )
    })?;
    let (eft, lft) = body.split_once(',').ok_or_else(err)?;
    let eft: i64 = eft.parse().map_err(|_| err())?;
    let lft = if let Some(rest) = lft.strip_suffix(']') {
        TimeBound::Finite(rest.parse().map_err(|_| err())?)
    } else if lft == "w[" {
        TimeBound::Infinite
    } else {
        return Err(syntax(
            number,
            format!("open interval bounds are not supported in '{}'", token),
        ));
    };
    if let TimeBound::Finite(upper) = lft
        && upper < eft
    {
        return Err(NetParseError::EmptyInterval {
            line: number,
            text: token.to_owned(),
            eft,
            lft: upper,
        });
    }
    Ok(TimeInterval { eft, lft })
}

pub fn parse_net_str(content: &str) -> Result<Net, NetParseError> {
    let mut parser = Parser::new();
    for (idx, line) in content.lines().enumerate() {
        parser.parse_line(idx + 1, line)?;
    }
    debug!(
        "parsed net '{}': {} places, {} transitions",
        parser.net.name.as_deref().unwrap_or("<anonymous>"),
        parser.net.places_len(),
        parser.net.transitions_len()
    );
    Ok(parser.net)
}

pub fn parse_net_file<P: AsRef<Path>>(path: P) -> Result<Net, NetParseError> {
    let content = fs::read_to_string(path)?;
    parse_net_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_transition_net() {
        let net = parse_net_str(
            "net demo\n\
             tr t0 [2,5] p0 -> p1\n\
             pl p0 (1)\n",
        )
        .unwrap();
        assert_eq!(net.name.as_deref(), Some("demo"));
        assert_eq!(net.places_len(), 2);
        let t0 = net.transition_named("t0").unwrap();
        assert_eq!(net.transitions[t0].interval, TimeInterval::closed(2, 5));
        assert_eq!(net.initial_marking().tokens(PlaceId::new(0)), 1);
    }

    #[test]
    fn default_interval_is_unconstrained() {
        let net = parse_net_str("tr t0 p0 -> p1\n").unwrap();
        let t0 = net.transition_named("t0").unwrap();
        assert_eq!(net.transitions[t0].interval, TimeInterval::UNCONSTRAINED);
    }

    #[test]
    fn weights_and_multipliers() {
        let net = parse_net_str("tr t0 p0*2K -> p1*3\npl p0 (4K)\n").unwrap();
        let t0 = net.transition_named("t0").unwrap();
        let p0 = PlaceId::new(0);
        let p1 = PlaceId::new(1);
        assert_eq!(*net.pre.get(p0, t0), 2_000);
        assert_eq!(*net.post.get(p1, t0), 3);
        assert_eq!(net.places[p0].tokens, 4_000);
    }

    #[test]
    fn labels_and_comments_are_skipped() {
        let net = parse_net_str(
            "# scenario net\n\
             tr t0 : work [1,w[ p0 -> p1  # arc list\n\
             pl p0 : buffer (2)\n",
        )
        .unwrap();
        let t0 = net.transition_named("t0").unwrap();
        assert_eq!(net.transitions[t0].label.as_deref(), Some("work"));
        assert_eq!(net.places[PlaceId::new(0)].tokens, 2);
    }

    #[test]
    fn rejects_open_and_empty_intervals() {
        assert!(matches!(
            parse_net_str("tr t0 ]2,5] p0 -> p1\n"),
            Err(NetParseError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            parse_net_str("tr t0 [5,2] p0 -> p1\n"),
            Err(NetParseError::EmptyInterval { eft: 5, lft: 2, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_transition() {
        assert!(matches!(
            parse_net_str("tr t0 p0 -> p1\ntr t0 p1 -> p0\n"),
            Err(NetParseError::DuplicateTransition { line: 2, .. })
        ));
    }
}
