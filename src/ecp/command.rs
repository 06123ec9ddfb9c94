use std::fmt;

/// Key actions the emulator forwards to the external sink. Launch/install
/// requests are accepted on the wire but only logged; they never become
/// commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    KeyPress,
    KeyDown,
    KeyUp,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::KeyPress => "keypress",
            CommandKind::KeyDown => "keydown",
            CommandKind::KeyUp => "keyup",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlCommand {
    pub kind: CommandKind,
    /// Key name or literal character, passed through verbatim.
    pub payload: String,
}

/// What a command path resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRoute {
    /// Forward to the command sink.
    Emit(ControlCommand),
    /// Recognized but unimplemented (launch/install); log and drop.
    Diagnostic { action: String, payload: String },
    /// Parsed fine but not an action we model; drop without comment.
    Unrecognized,
    /// Path does not match the `/<action>/<argument>` shape; drop silently.
    NoMatch,
}

/// Parse an ECP command path of the shape `/<action>/<argument>`.
///
/// Exactly two slash-delimited segments are required after the leading
/// slash; the argument must be non-empty and contain no whitespace. This
/// function is total: malformed paths from exploratory or legacy clients
/// are a normal occurrence and resolve to `NoMatch`, never an error.
pub fn route_command(path: &str) -> CommandRoute {
    let Some(rest) = path.strip_prefix('/') else {
        return CommandRoute::NoMatch;
    };
    let Some((action, argument)) = rest.split_once('/') else {
        return CommandRoute::NoMatch;
    };
    if action.is_empty()
        || argument.is_empty()
        || argument.contains('/')
        || argument.contains(char::is_whitespace)
    {
        return CommandRoute::NoMatch;
    }

    let kind = match action {
        "keypress" => Some(CommandKind::KeyPress),
        "keydown" => Some(CommandKind::KeyDown),
        "keyup" => Some(CommandKind::KeyUp),
        _ => None,
    };

    match kind {
        Some(kind) => CommandRoute::Emit(ControlCommand {
            kind,
            payload: argument.to_string(),
        }),
        None if action == "launch" || action == "install" => CommandRoute::Diagnostic {
            action: action.to_string(),
            payload: argument.to_string(),
        },
        None => CommandRoute::Unrecognized,
    }
}

/// One-way, fire-and-forget delivery of parsed commands to the surrounding
/// application. Implementations must never block the protocol handler and
/// the emulator gives no delivery guarantee.
pub trait CommandSink: Send + Sync {
    fn deliver(&self, command: ControlCommand);
}

impl CommandSink for std::sync::mpsc::Sender<ControlCommand> {
    fn deliver(&self, command: ControlCommand) {
        let _ = self.send(command);
    }
}

impl CommandSink for tokio::sync::mpsc::UnboundedSender<ControlCommand> {
    fn deliver(&self, command: ControlCommand) {
        let _ = self.send(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_actions_emit() {
        for (path, kind) in [
            ("/keypress/Select", CommandKind::KeyPress),
            ("/keydown/Home", CommandKind::KeyDown),
            ("/keyup/Lit_a", CommandKind::KeyUp),
        ] {
            match route_command(path) {
                CommandRoute::Emit(command) => {
                    assert_eq!(command.kind, kind);
                    assert_eq!(command.payload, path.rsplit('/').next().unwrap());
                }
                other => panic!("expected Emit for {}, got {:?}", path, other),
            }
        }
    }

    #[test]
    fn test_launch_and_install_are_diagnostic_only() {
        assert_eq!(
            route_command("/launch/12"),
            CommandRoute::Diagnostic {
                action: "launch".to_string(),
                payload: "12".to_string()
            }
        );
        assert!(matches!(
            route_command("/install/837"),
            CommandRoute::Diagnostic { .. }
        ));
    }

    #[test]
    fn test_unknown_action_is_unrecognized() {
        assert_eq!(route_command("/reboot/now"), CommandRoute::Unrecognized);
    }

    #[test]
    fn test_malformed_paths_do_not_match() {
        assert_eq!(route_command("/keydown/"), CommandRoute::NoMatch);
        assert_eq!(route_command("/keydown"), CommandRoute::NoMatch);
        assert_eq!(route_command("//Home"), CommandRoute::NoMatch);
        assert_eq!(route_command("/keydown/Home/extra"), CommandRoute::NoMatch);
        assert_eq!(route_command("/keydown/Ho me"), CommandRoute::NoMatch);
        assert_eq!(route_command("keydown/Home"), CommandRoute::NoMatch);
        assert_eq!(route_command(""), CommandRoute::NoMatch);
        assert_eq!(route_command("/"), CommandRoute::NoMatch);
    }

    #[test]
    fn test_sink_never_errors_when_receiver_gone() {
        let (tx, rx) = std::sync::mpsc::channel::<ControlCommand>();
        drop(rx);
        // Delivery with no consumer is a silent no-op.
        tx.deliver(ControlCommand {
            kind: CommandKind::KeyPress,
            payload: "Home".to_string(),
        });
    }

    #[test]
    fn test_tokio_sink_delivers() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ControlCommand>();
        tx.deliver(ControlCommand {
            kind: CommandKind::KeyUp,
            payload: "Back".to_string(),
        });
        let command = rx.try_recv().unwrap();
        assert_eq!(command.kind, CommandKind::KeyUp);
        assert_eq!(command.payload, "Back");
    }
}
