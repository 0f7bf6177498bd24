#[derive(Clone, Copy, Debug)]
pub(crate) struct CommandSpec {
    pub command: &'static str,
    pub action: &'static str,
}

pub(crate) const NO_ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "help",
        action: "help",
    },
    CommandSpec {
        command: "new",
        action: "new_chat",
    },
    CommandSpec {
        command: "profile",
        action: "show_profile",
    },
    CommandSpec {
        command: "retry",
        action: "retry",
    },
    CommandSpec {
        command: "quit",
        action: "quit",
    },
    CommandSpec {
        command: "exit",
        action: "quit",
    },
];

pub(crate) const THEME_COMMAND: CommandSpec = CommandSpec {
    command: "theme",
    action: "set_theme",
};

pub(crate) const SAVE_COMMAND: CommandSpec = CommandSpec {
    command: "save",
    action: "save_artifact",
};

pub const CHAT_HELP_COMMANDS: &[&str] = &[
    "/help",
    "/new",
    "/theme",
    "/profile",
    "/save",
    "/retry",
    "/quit",
];
