//! Minimal IRC line protocol: parsing inbound messages, CTCP ACTION framing.
//!
//! Only the slice of RFC 1459 the client itself exercises is implemented;
//! protocol compliance beyond that is out of scope.

/// CTCP messages are delimited by 0x01 on both ends.
const CTCP_DELIM: char = '\u{1}';

/// Numeric reply sent by the server once registration completes.
pub const RPL_WELCOME: &str = "001";

/// Numeric reply for a nickname already in use during registration.
pub const ERR_NICKNAMEINUSE: &str = "433";

/// One parsed inbound IRC line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMessage {
    /// Message source (`nick!user@host` or server name), without the `:`.
    pub prefix: Option<String>,
    /// Command word or three-digit numeric.
    pub command: String,
    /// Positional parameters; a trailing `:`-parameter is the last entry.
    pub params: Vec<String>,
}

/// Parse one inbound line. Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<IrcMessage> {
    let mut rest = line.trim_end_matches(['\r', '\n']);
    if rest.trim().is_empty() {
        return None;
    }

    let prefix = if let Some(tail) = rest.strip_prefix(':') {
        let (prefix, tail) = tail.split_once(' ')?;
        rest = tail.trim_start();
        Some(prefix.to_owned())
    } else {
        None
    };

    let mut params = Vec::new();
    let command = match rest.split_once(' ') {
        Some((command, tail)) => {
            let mut tail = tail.trim_start();
            while !tail.is_empty() {
                if let Some(trailing) = tail.strip_prefix(':') {
                    params.push(trailing.to_owned());
                    break;
                }
                match tail.split_once(' ') {
                    Some((param, next)) => {
                        params.push(param.to_owned());
                        tail = next.trim_start();
                    }
                    None => {
                        params.push(tail.to_owned());
                        break;
                    }
                }
            }
            command
        }
        None => rest,
    };

    Some(IrcMessage {
        prefix,
        command: command.to_owned(),
        params,
    })
}

/// Extract the nickname from a `nick!user@host` prefix.
pub fn nick_of(prefix: &str) -> &str {
    prefix.split(['!', '@']).next().unwrap_or(prefix)
}

/// Decode a CTCP ACTION payload, if `text` is one.
pub fn decode_action(text: &str) -> Option<&str> {
    let inner = text.strip_prefix(CTCP_DELIM)?;
    let inner = inner.strip_suffix(CTCP_DELIM).unwrap_or(inner);
    inner.strip_prefix("ACTION").map(str::trim_start)
}

/// Wrap action text in CTCP ACTION framing for PRIVMSG.
pub fn encode_action(text: &str) -> String {
    format!("{CTCP_DELIM}ACTION {text}{CTCP_DELIM}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn parses_privmsg_with_prefix_and_trailing() {
        let msg = parse_line(":alice!ali@example.net PRIVMSG #talk :hello there\r\n").unwrap();
        assert_eq!(msg.prefix.as_deref(), Some("alice!ali@example.net"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#talk", "hello there"]);
    }

    #[test]
    fn parses_numeric_welcome() {
        let msg = parse_line(":irc.example.net 001 crier :Welcome to IRC").unwrap();
        assert_eq!(msg.command, RPL_WELCOME);
        assert_eq!(msg.params[0], "crier");
    }

    #[test]
    fn parses_ping_without_prefix() {
        let msg = parse_line("PING :irc.example.net").unwrap();
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params, vec!["irc.example.net"]);
    }

    #[test]
    fn parses_command_with_no_params() {
        let msg = parse_line("AWAY").unwrap();
        assert_eq!(msg.command, "AWAY");
        assert!(msg.params.is_empty());
    }

    #[test]
    fn blank_line_is_none() {
        assert_eq!(parse_line("\r\n"), None);
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn nick_of_strips_user_and_host() {
        assert_eq!(nick_of("alice!ali@example.net"), "alice");
        assert_eq!(nick_of("irc.example.net"), "irc.example.net");
    }

    #[test]
    fn action_roundtrip() {
        let framed = encode_action("waves");
        assert_eq!(decode_action(&framed), Some("waves"));
    }

    #[test]
    fn decode_action_tolerates_missing_trailing_delimiter() {
        assert_eq!(decode_action("\u{1}ACTION waves"), Some("waves"));
    }

    #[test]
    fn plain_text_is_not_an_action() {
        assert_eq!(decode_action("just chatting"), None);
        assert_eq!(decode_action("\u{1}VERSION\u{1}"), None);
    }
}
