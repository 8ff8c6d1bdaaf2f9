//! Firing sequences (scenarios): an ordered list of transition occurrences,
//! optionally timestamped.
//!
//! Textual form, one step per line: `<transition>` or `<transition> @ <date>`,
//! with `#` starting a comment. The replay writer in [`crate::report`] emits
//! the same syntax, so a solved schedule can be fed back to a simulator or to
//! this tool. Timestamps are discarded when deriving a constraint system.
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::{Net, TransitionId};

#[derive(Debug, Error)]
pub enum SequenceParseError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: invalid step '{text}'")]
    Syntax { line: usize, text: String },
    #[error("line {line}: unknown transition '{name}'")]
    UnknownTransition { line: usize, name: String },
}

/// One entry of a firing sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiringStep {
    pub transition: TransitionId,
    pub date: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiringSequence {
    pub steps: Vec<FiringStep>,
}

impl FiringSequence {
    pub fn new(steps: Vec<FiringStep>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FiringStep> {
        self.steps.iter()
    }
}

/// Parse a scenario against `net`; transition names must resolve.
pub fn parse_sequence_str(net: &Net, content: &str) -> Result<FiringSequence, SequenceParseError> {
    let mut steps = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let text = match raw.find('#') {
            Some(at) => &raw[..at],
            None => raw,
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let (name, date) = match text.split_once('@') {
            Some((name, date)) => {
                let date = date.trim().parse::<i64>().map_err(|_| {
                    SequenceParseError::Syntax {
                        line,
                        text: text.to_owned(),
                    }
                })?;
                (name.trim(), Some(date))
            }
            None => (text, None),
        };
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(SequenceParseError::Syntax {
                line,
                text: text.to_owned(),
            });
        }
        let transition =
            net.transition_named(name)
                .ok_or_else(|| SequenceParseError::UnknownTransition {
                    line,
                    name: name.to_owned(),
                })?;
        steps.push(FiringStep { transition, date });
    }
    Ok(FiringSequence::new(steps))
}

pub fn parse_sequence_file<P: AsRef<Path>>(
    net: &Net,
    path: P,
) -> Result<FiringSequence, SequenceParseError> {
    let content = fs::read_to_string(path)?;
    parse_sequence_str(net, &content)
}

/// Read a scenario from an arbitrary reader (the default input stream case).
pub fn parse_sequence_reader<R: Read>(
    net: &Net,
    mut reader: R,
) -> Result<FiringSequence, SequenceParseError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_sequence_str(net, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::parse_net_str;

    fn demo_net() -> Net {
        parse_net_str("tr t0 [2,5] p0 -> p1\ntr t1 p1 -> p0\npl p0 (1)\n").unwrap()
    }

    #[test]
    fn parses_names_and_timestamps() {
        let net = demo_net();
        let seq = parse_sequence_str(&net, "t0\nt1 @ 7\n# trailing comment\n").unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.steps[0].transition, net.transition_named("t0").unwrap());
        assert_eq!(seq.steps[0].date, None);
        assert_eq!(seq.steps[1].date, Some(7));
    }

    #[test]
    fn unknown_transition_is_an_error() {
        let net = demo_net();
        assert!(matches!(
            parse_sequence_str(&net, "t0\nt9\n"),
            Err(SequenceParseError::UnknownTransition { line: 2, .. })
        ));
    }

    #[test]
    fn malformed_date_is_an_error() {
        let net = demo_net();
        assert!(matches!(
            parse_sequence_str(&net, "t0 @ soon\n"),
            Err(SequenceParseError::Syntax { line: 1, .. })
        ));
    }
}
