use std::collections::BTreeMap;

use serde_json::Value;

use super::command_registry::{CommandSpec, NO_ARG_COMMANDS, SAVE_COMMAND, THEME_COMMAND};

/// Parsed user action. Slash commands map to named actions; everything
/// else is a `send` intent carrying the prompt text.
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub action: String,
    pub raw: String,
    pub prompt: Option<String>,
    pub command_args: BTreeMap<String, Value>,
}

impl Intent {
    fn new(action: &str, raw: &str) -> Self {
        Self {
            action: action.to_string(),
            raw: raw.to_string(),
            prompt: None,
            command_args: BTreeMap::new(),
        }
    }
}

fn find_action(command: &str, specs: &[CommandSpec]) -> Option<&'static str> {
    specs
        .iter()
        .find(|spec| spec.command == command)
        .map(|spec| spec.action)
}

fn optional_arg(arg: &str) -> Value {
    if arg.is_empty() {
        Value::Null
    } else {
        Value::String(arg.to_string())
    }
}

pub fn parse_intent(text: &str) -> Intent {
    let raw_trimmed = text.trim();
    if raw_trimmed.is_empty() {
        return Intent::new("noop", text);
    }

    if let Some(slash_tail) = raw_trimmed.strip_prefix('/') {
        let command_len = slash_tail
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .count();
        if command_len > 0 {
            let command = slash_tail[..command_len].to_ascii_lowercase();
            let remainder = &slash_tail[command_len..];
            let arg = if remainder.is_empty() {
                ""
            } else {
                remainder.trim()
            };

            if command == THEME_COMMAND.command {
                // `/theme` with no arg toggles; with an arg it sets.
                let mut intent = Intent::new(THEME_COMMAND.action, text);
                intent
                    .command_args
                    .insert("theme".to_string(), optional_arg(arg));
                return intent;
            }

            if command == SAVE_COMMAND.command {
                let mut intent = Intent::new(SAVE_COMMAND.action, text);
                intent
                    .command_args
                    .insert("path".to_string(), optional_arg(arg));
                return intent;
            }

            if let Some(action) = find_action(&command, NO_ARG_COMMANDS) {
                return Intent::new(action, text);
            }

            let mut intent = Intent::new("unknown", text);
            intent
                .command_args
                .insert("command".to_string(), Value::String(command));
            intent
                .command_args
                .insert("arg".to_string(), Value::String(arg.to_string()));
            return intent;
        }
    }

    let mut intent = Intent::new("send", text);
    intent.prompt = Some(raw_trimmed.to_string());
    intent
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_intent;

    #[test]
    fn plain_text_becomes_send_intent() {
        let intent = parse_intent("  draw a cat  ");
        assert_eq!(intent.action, "send");
        assert_eq!(intent.prompt.as_deref(), Some("draw a cat"));
        assert_eq!(intent.raw, "  draw a cat  ");
    }

    #[test]
    fn blank_input_is_noop() {
        assert_eq!(parse_intent("   ").action, "noop");
        assert_eq!(parse_intent("").action, "noop");
    }

    #[test]
    fn no_arg_commands_parse() {
        assert_eq!(parse_intent("/help").action, "help");
        assert_eq!(parse_intent("/new").action, "new_chat");
        assert_eq!(parse_intent("/profile").action, "show_profile");
        assert_eq!(parse_intent("/retry").action, "retry");
        assert_eq!(parse_intent("/quit").action, "quit");
        assert_eq!(parse_intent("/exit").action, "quit");
    }

    #[test]
    fn theme_command_carries_optional_value() {
        let toggle = parse_intent("/theme");
        assert_eq!(toggle.action, "set_theme");
        assert_eq!(toggle.command_args["theme"], json!(null));

        let set = parse_intent("/theme light");
        assert_eq!(set.action, "set_theme");
        assert_eq!(set.command_args["theme"], json!("light"));
    }

    #[test]
    fn save_command_carries_optional_path() {
        let default_path = parse_intent("/save");
        assert_eq!(default_path.action, "save_artifact");
        assert_eq!(default_path.command_args["path"], json!(null));

        let explicit = parse_intent("/save /tmp/cat.png");
        assert_eq!(explicit.command_args["path"], json!("/tmp/cat.png"));
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse_intent("/HELP").action, "help");
        assert_eq!(parse_intent("/Theme dark").command_args["theme"], json!("dark"));
    }

    #[test]
    fn unknown_command_keeps_command_and_arg() {
        let intent = parse_intent("/magic foo bar");
        assert_eq!(intent.action, "unknown");
        assert_eq!(intent.command_args["command"], json!("magic"));
        assert_eq!(intent.command_args["arg"], json!("foo bar"));
    }

    #[test]
    fn lone_slash_is_sent_as_text() {
        let intent = parse_intent("/ ");
        assert_eq!(intent.action, "send");
        assert_eq!(intent.prompt.as_deref(), Some("/"));
    }
}
