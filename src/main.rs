use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::time::Duration;

use keyseq::cli::CliArgs;
use keyseq::dispatch::{Dispatcher, Hook, HookPayload, Host, KeyOutcome};
use keyseq::keymap::{
    join_tokens, load_init, parse_key_sequence, token_from_raw, CommandRegistry, HelpPage,
    InitFile, KeyEvent, KeyMapStore,
};

/// Host that reports everything on stdout
struct ConsoleHost {
    editable: bool,
    caret: bool,
}

impl Host for ConsoleHost {
    fn is_editable_target(&self, _event: &KeyEvent) -> bool {
        self.editable
    }

    fn is_caret_browsing_active(&self) -> bool {
        self.caret
    }

    fn echo_status(&mut self, message: &str, timeout: Option<Duration>) {
        if message.is_empty() {
            return;
        }
        match timeout {
            Some(t) => println!("[status] {} ({}ms)", message, t.as_millis()),
            None => println!("[status] {}", message),
        }
    }

    fn stop_propagation(&mut self, _event: &KeyEvent) {}

    fn notify(&mut self, hook: Hook, payload: HookPayload<'_>) {
        if let HookPayload::Event(event) = payload {
            println!("[hook] {} ({})", hook, token_from_raw(&event.raw));
        } else {
            tracing::trace!(%hook, "hook");
        }
    }

    fn insert_text(&mut self, text: &str) {
        println!("[insert] {}", text);
    }

    fn show_help(&mut self, page: &HelpPage) {
        print!("{}", page);
    }

    fn deliver(&mut self, event: &KeyEvent) {
        println!("[key] {}", token_from_raw(&event.raw));
    }
}

/// A registry where every command named in `init` prints its invocation
fn printing_registry(init: &InitFile) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for name in init.command_names() {
        let label = name.to_string();
        registry.register(name, move |event, arg| match arg {
            Some(n) => println!("{} [{}] (arg {})", label, token_from_raw(&event.raw), n),
            None => println!("{} [{}]", label, token_from_raw(&event.raw)),
        });
    }
    registry
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    keyseq::tracing::init();

    let init = load_init(args.init.as_deref()).context("Failed to load init file")?;
    let registry = printing_registry(&init);

    let mut store = KeyMapStore::new();
    init.apply(&mut store, &registry)
        .context("Failed to apply init file")?;
    tracing::info!(bindings = store.binding_count(), "Keymaps ready");

    let host = ConsoleHost {
        editable: args.editable,
        caret: args.caret,
    };
    let mut dispatcher = Dispatcher::new(store, init.config.clone(), host);

    if args.dump {
        let yaml = dispatcher.init_file().context("Failed to serialize keymaps")?;
        print!("{}", yaml);
        return Ok(());
    }

    if args.list {
        print!("{}", dispatcher.list_key_bindings());
        return Ok(());
    }

    let tokens = if args.reads_stdin() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read keys from stdin")?;
        parse_key_sequence(&input)
    } else {
        args.tokens()
    };

    for token in &tokens {
        if dispatcher.handle_token(token) == KeyOutcome::Unhandled {
            println!("{}: unhandled", token);
        }
    }

    if !dispatcher.key_sequence().is_empty() {
        println!("incomplete: {}", join_tokens(dispatcher.key_sequence()));
    }

    Ok(())
}
