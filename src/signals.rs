//! Root-name command channel (spec.md §4.9 "fake-signal protocol" and the
//! companion `#!cmd###arg` form; spec.md §9 Open Question: "the two root
//! name command forms... should be unified behind one parser"). Grounded on
//! the teacher's `x::query`/`ClientMessage` property-decoding style, adapted
//! to parse `XSetWMName`-style `WM_NAME` changes on the root window rather
//! than a `ClientMessage`.
use std::str::FromStr;

/// A decoded root-name command, regardless of which wire form carried it.
#[derive(Debug, Clone, PartialEq)]
pub enum RootCommand {
    /// `fsignal:<n>`: invoke signal table entry `n` with no arguments.
    Signal(i32),
    /// `#!<cmd>###<arg1>###<arg2>...`: invoke a named command with arguments.
    Named { cmd: String, args: Vec<String> },
}

const FSIGNAL_PREFIX: &str = "fsignal:";
const NAMED_PREFIX: &str = "#!";
const NAMED_ARG_SEP: &str = "###";

/// Parse a new root window name into a [`RootCommand`], if it matches either
/// recognised form. Unrecognised names (plain user-set root titles) yield
/// `None` rather than an error, matching spec.md §7's permissive handling of
/// malformed/unexpected client input.
pub fn parse_root_name(name: &str) -> Option<RootCommand> {
    if let Some(rest) = name.strip_prefix(FSIGNAL_PREFIX) {
        return i32::from_str(rest.trim()).ok().map(RootCommand::Signal);
    }

    if let Some(rest) = name.strip_prefix(NAMED_PREFIX) {
        let mut parts = rest.split(NAMED_ARG_SEP);
        let cmd = parts.next()?.to_string();
        if cmd.is_empty() {
            return None;
        }
        let args = parts.map(str::to_string).collect();
        return Some(RootCommand::Named { cmd, args });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fsignal_form() {
        assert_eq!(parse_root_name("fsignal:4"), Some(RootCommand::Signal(4)));
    }

    #[test]
    fn parses_named_form_with_args() {
        assert_eq!(
            parse_root_name("#!setlayout###1"),
            Some(RootCommand::Named { cmd: "setlayout".into(), args: vec!["1".into()] })
        );
    }

    #[test]
    fn parses_named_form_with_no_args() {
        assert_eq!(
            parse_root_name("#!togglebar"),
            Some(RootCommand::Named { cmd: "togglebar".into(), args: vec![] })
        );
    }

    #[test]
    fn rejects_malformed_fsignal() {
        assert_eq!(parse_root_name("fsignal:banana"), None);
    }

    #[test]
    fn plain_titles_are_not_commands() {
        assert_eq!(parse_root_name("my desktop"), None);
    }
}
