//! Built-in commands and the stock variable callback.

use super::{
    CommandArgs, CommandContext, ConCommand, ConsoleError, ConsoleRegistry, ConsoleSink, VarKind,
};

const HELP_BANNER: &str = "--------------------COMMANDS--------------------";
const HELP_FOOTER: &str = "------------------------------------------------";

/// Install `clear`/`cls`, `help`, `say`/`print`, `cvarlist`, `find` and `reset`.
///
/// A name that is already taken is skipped and the rest are still
/// installed. The first such error is returned.
pub fn register_builtins(registry: &mut ConsoleRegistry) -> Result<(), ConsoleError> {
    let results = [
        registry
            .register_bool_var("clear", false, "Clear the console", clear, &[], false)
            .map(drop),
        registry.register_alias("cls", "clear"),
        registry
            .register_bool_var("help", false, "Gives all available commands", help, &[], false)
            .map(drop),
        registry
            .register_bool_var(
                "say",
                false,
                "Print a message in this console",
                say,
                &["message_string"],
                false,
            )
            .map(drop),
        registry.register_alias("print", "say"),
        registry
            .register_bool_var(
                "cvarlist",
                false,
                "List variables, optionally only those starting with a prefix",
                cvarlist,
                &[],
                false,
            )
            .map(drop),
        registry
            .register_bool_var(
                "find",
                false,
                "Search names and descriptions",
                find,
                &["query"],
                false,
            )
            .map(drop),
        registry
            .register_bool_var(
                "reset",
                false,
                "Set a variable back to its default value",
                reset,
                &["name"],
                false,
            )
            .map(drop),
    ];

    results.into_iter().collect()
}

/// Stock callback for variables.
///
/// Without parameters it prints the current value; otherwise it parses the
/// parameters as the variable's kind and assigns them. Strings take every
/// parameter joined by spaces.
pub fn assign_variable(
    command: &ConCommand,
    args: &CommandArgs<'_>,
    ctx: &mut CommandContext<'_>,
) -> bool {
    if args.params().is_empty() {
        ctx.console
            .info(&format!("\"{}\" = \"{}\"", command.name(), command.value()));
        return true;
    }

    let text = match command.kind() {
        VarKind::Text => args.join_params(" "),
        _ => args.params()[0].to_string(),
    };

    command.set_from_str(&text, Some(&mut *ctx.console)).is_ok()
}

fn clear(_: &ConCommand, _: &CommandArgs<'_>, ctx: &mut CommandContext<'_>) -> bool {
    ctx.console.clear();
    true
}

fn help(_: &ConCommand, args: &CommandArgs<'_>, ctx: &mut CommandContext<'_>) -> bool {
    if let Some(name) = args.param(0) {
        return describe(name, ctx);
    }

    ctx.console.info(HELP_BANNER);
    for (name, command) in ctx.registry.iter() {
        let description = command.get_description();
        if description.is_empty() {
            ctx.console.info(name);
        } else {
            ctx.console.info(&format!("{} - {}", name, description));
        }
    }
    ctx.console.info(HELP_FOOTER);
    true
}

/// `help <name>`: usage, description and value of one entry.
fn describe(name: &str, ctx: &mut CommandContext<'_>) -> bool {
    let Some(command) = ctx.registry.get_command(name) else {
        let err = ConsoleError::UnknownCommand {
            name: name.to_string(),
        };
        ctx.console.error(&err.to_string());
        return false;
    };

    let mut usage = name.to_string();
    for argument in command.get_arguments() {
        usage.push_str(&format!(" <{argument}>"));
    }
    if command.is_variable() {
        usage.push_str(&format!(" <{}>", command.kind()));
    }
    ctx.console.info(&format!("usage: {}", usage));

    if !command.get_description().is_empty() {
        ctx.console.info(command.get_description());
    }

    if command.is_variable() {
        ctx.console.info(&format!(
            "value: {} (default: {})",
            command.value(),
            command.default_value()
        ));

        let state = command.state();
        match (&state.min, &state.max) {
            (Some(min), Some(max)) => ctx.console.info(&format!("range: {} - {}", min, max)),
            (Some(min), None) => ctx.console.info(&format!("min: {}", min)),
            (None, Some(max)) => ctx.console.info(&format!("max: {}", max)),
            (None, None) => {}
        }
    }
    true
}

fn say(_: &ConCommand, args: &CommandArgs<'_>, ctx: &mut CommandContext<'_>) -> bool {
    ctx.console.info(&args.join_params(" "));
    true
}

fn cvarlist(_: &ConCommand, args: &CommandArgs<'_>, ctx: &mut CommandContext<'_>) -> bool {
    let prefix = args.param(0).unwrap_or_default();

    let mut count = 0;
    for name in ctx.registry.names_with_prefix(prefix) {
        let Some(command) = ctx.registry.get_command(name) else {
            continue;
        };
        if !command.is_variable() {
            continue;
        }

        let marker = if command.is_modified() { "*" } else { "" };
        ctx.console
            .info(&format!("{} = {}{}", name, command.value(), marker));
        count += 1;
    }

    ctx.console.info(&format!("{} variable(s)", count));
    true
}

fn find(_: &ConCommand, args: &CommandArgs<'_>, ctx: &mut CommandContext<'_>) -> bool {
    let query = args.join_params(" ");
    let matches = ctx.registry.search(&query);

    if matches.is_empty() {
        ctx.console.warning(&format!("No matches for '{}'", query));
        return false;
    }

    for (name, command) in matches {
        let description = command.get_description();
        if description.is_empty() {
            ctx.console.info(name);
        } else {
            ctx.console.info(&format!("{} - {}", name, description));
        }
    }
    true
}

fn reset(_: &ConCommand, args: &CommandArgs<'_>, ctx: &mut CommandContext<'_>) -> bool {
    let Some(name) = args.param(0) else {
        return false;
    };

    let Some(command) = ctx.registry.get_command(name) else {
        let err = ConsoleError::UnknownCommand {
            name: name.to_string(),
        };
        ctx.console.error(&err.to_string());
        return false;
    };

    command.reset(Some(&mut *ctx.console)).is_ok()
}
