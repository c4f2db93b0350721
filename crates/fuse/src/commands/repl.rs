//! REPL (Read-Eval-Print Loop) implementation for interactive chat.

use std::time::Duration;

use anyhow::Result;
use console::{Style, Term, style};
use fuse_chat::{Conversation, TurnError};
use fuse_config::{ChatSettings, Provider};
use fuse_session::{ConnectionStatus, DebugLevel, Message, StateChange};
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// REPL state and configuration.
pub struct Repl {
    conversation: Conversation,
    settings: ChatSettings,
    changes: broadcast::Receiver<StateChange>,
    editor: Editor<(), DefaultHistory>,
    term: Term,
    verbose: bool,
}

impl Repl {
    /// Create a new REPL instance.
    pub fn new(conversation: Conversation, settings: ChatSettings, verbose: bool) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        let editor = Editor::with_config(config)?;
        let changes = conversation.subscribe();

        Ok(Self {
            conversation,
            settings,
            changes,
            editor,
            term: Term::stdout(),
            verbose,
        })
    }

    /// Run the REPL loop.
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = self.format_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        let flow = self.handle_slash_command(line).await;
                        if let Err(e) = self.render_changes() {
                            self.print_error(&format!("Display error: {}", e));
                        }
                        match flow {
                            Ok(ControlFlow::Continue) => continue,
                            Ok(ControlFlow::Exit) => break,
                            Err(e) => {
                                self.print_error(&format!("Command error: {}", e));
                                continue;
                            }
                        }
                    }

                    self.send_message(line).await;
                    if let Err(e) = self.render_changes() {
                        self.print_error(&format!("Display error: {}", e));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!();
                    self.print_dim("(Interrupted - type /quit to exit)");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        self.print_dim("Goodbye!");
        Ok(())
    }

    /// Send a message, showing a spinner while the server is working.
    ///
    /// The reply (or error) is rendered from the resulting state changes.
    async fn send_message(&mut self, message: &str) {
        let spinner = spinner("Thinking...");
        let result = self.conversation.submit(message, &self.settings).await;
        spinner.finish_and_clear();

        match result {
            Ok(_) => {}
            Err(TurnError::Validation(msg)) => self.print_warning(&msg),
            Err(e) => self.print_error(&e.to_string()),
        }
    }

    async fn test_connection(&mut self) {
        let spinner = spinner("Testing connection...");
        let result = self.conversation.test_connection(&self.settings).await;
        spinner.finish_and_clear();

        match result {
            Ok(check) if check.connected => {
                let green = Style::new().green();
                println!("{} {}", green.apply_to("✓"), check.message);
            }
            Ok(check) => self.print_error(&check.message),
            Err(TurnError::Validation(msg)) => self.print_warning(&msg),
            Err(e) => self.print_error(&e.to_string()),
        }
    }

    /// Handle a slash command.
    async fn handle_slash_command(&mut self, input: &str) -> Result<ControlFlow> {
        let parts: Vec<&str> = input[1..].split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");
        let args = &parts[1..];

        match cmd {
            "quit" | "q" | "exit" => {
                return Ok(ControlFlow::Exit);
            }
            "help" | "h" | "?" => {
                self.print_help();
            }
            "clear" => {
                self.conversation.clear_chat();
            }
            "new" => {
                self.conversation.new_session();
            }
            "test" | "ping" => {
                self.test_connection().await;
            }
            "status" => {
                self.print_status();
            }
            "logs" => {
                self.print_logs();
            }
            "clear-logs" => {
                self.conversation.clear_debug_logs();
            }
            "server" => match args.first() {
                Some(url) => {
                    self.settings = self.settings.clone().with_server_url(*url);
                    println!("Server: {}", url);
                }
                None => self.print_setting("Server", self.server_display()),
            },
            "provider" => match args.first() {
                Some(name) => match name.parse::<Provider>() {
                    Ok(provider) => {
                        self.settings = self.settings.clone().with_provider(provider);
                        println!(
                            "Provider: {} {}",
                            provider,
                            style(format!("(model: {})", self.settings.model)).dim()
                        );
                    }
                    Err(e) => self.print_error(&e.to_string()),
                },
                None => self.print_setting("Provider", self.settings.provider.as_str()),
            },
            "model" => match args.first() {
                Some(model) => {
                    self.settings = self.settings.clone().with_model(*model);
                    println!("Model: {}", model);
                }
                None => self.print_setting("Model", &self.settings.model),
            },
            "memory" => match args.first().map(|s| parse_switch(s)) {
                Some(Some(on)) => {
                    self.settings = self.settings.clone().with_memory(on);
                    println!("Memory: {}", switch_label(on));
                }
                Some(None) => self.print_error("Usage: /memory <on|off>"),
                None => self.print_setting("Memory", switch_label(self.settings.use_memory)),
            },
            "" => {
                self.print_dim("Type /help for available commands");
            }
            _ => {
                self.print_error(&format!("Unknown command: /{}", cmd));
                self.print_dim("Type /help for available commands");
            }
        }

        Ok(ControlFlow::Continue)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State change rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Render every state change published since the last call.
    fn render_changes(&mut self) -> Result<()> {
        loop {
            match self.changes.try_recv() {
                Ok(change) => self.render(change)?,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "display fell behind session changes");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
            }
        }
    }

    fn render(&self, change: StateChange) -> Result<()> {
        match change {
            StateChange::MessageAppended { index } => {
                if let Some(message) = self.conversation.message(index) {
                    self.print_message(&message);
                }
            }
            StateChange::MessagesCleared => {
                self.term.clear_screen()?;
                self.print_welcome();
            }
            StateChange::SessionReset { session_id } => {
                self.term.clear_screen()?;
                self.print_welcome();
                self.print_dim(&format!("Started new session {}", session_id));
            }
            StateChange::ConnectionStatusChanged(status) => {
                println!("Status: {}", status_badge(status));
            }
            StateChange::DebugLogCleared => {
                self.print_dim("Debug logs cleared");
            }
            // Shown on demand with /logs.
            StateChange::DebugLogAppended => {}
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────────

    fn print_message(&self, message: &Message) {
        let dim = Style::new().dim();

        // The prompt line already shows what the user typed.
        if message.is_user() {
            return;
        }

        if message.is_error {
            let red = Style::new().red();
            println!(
                "{} {}",
                red.apply_to("✗ Assistant").bold(),
                dim.apply_to(&message.timestamp)
            );
            println!("{}", red.apply_to(&message.content));
        } else {
            println!(
                "{} {}",
                style("Assistant").cyan().bold(),
                dim.apply_to(&message.timestamp)
            );
            println!("{}", message.content);
        }
        println!();
    }

    fn print_welcome(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Fuse Chat").bold().cyan());
        println!("{}", dim.apply_to("─".repeat(40)));
        if self.conversation.messages().is_empty() {
            println!("Welcome to the Fuse Chatbot!");
            println!(
                "{}",
                dim.apply_to("Type your message and press Enter to chat.")
            );
        }
        if !self.settings.has_server_url() {
            println!(
                "{}",
                dim.apply_to("No server configured yet: use /server <url>.")
            );
        }
        println!(
            "{}",
            dim.apply_to("Use /help for commands, Ctrl+D to exit.")
        );
        println!();
    }

    fn print_help(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Available Commands").bold());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!("  {}  - Exit the REPL", style("/quit, /q").cyan());
        println!("  {}  - Show this help", style("/help, /h, /?").cyan());
        println!("  {}  - Clear the chat", style("/clear").cyan());
        println!("  {}  - Start a new session", style("/new").cyan());
        println!("  {}  - Test the server connection", style("/test").cyan());
        println!("  {}  - Show connection and session info", style("/status").cyan());
        println!("  {}  - Show recent debug logs", style("/logs").cyan());
        println!("  {}  - Clear debug logs", style("/clear-logs").cyan());
        println!("  {}  - Set the server URL", style("/server <url>").cyan());
        println!(
            "  {}  - Switch provider",
            style("/provider <openai|anthropic>").cyan()
        );
        println!("  {}  - Set the model", style("/model <name>").cyan());
        println!(
            "  {}  - Toggle conversation memory",
            style("/memory <on|off>").cyan()
        );
        println!();
        println!("{}", dim.apply_to("Keyboard shortcuts:"));
        println!("  {} - Interrupt input", dim.apply_to("Ctrl+C"));
        println!("  {} - Exit the REPL", dim.apply_to("Ctrl+D"));
        println!();
    }

    fn print_status(&self) {
        let session = self.conversation.session();
        let (short_id, count, status) = {
            let state = session.read();
            (
                state.short_session_id(),
                state.message_count(),
                state.connection_status(),
            )
        };

        println!();
        println!("Connection: {}", status_badge(status));
        println!("Server:     {}", self.server_display());
        println!("Session ID: {}", short_id);
        println!("Messages:   {}", count);
        println!("Provider:   {}", self.settings.provider);
        println!("Model:      {}", self.settings.model);
        println!("Memory:     {}", switch_label(self.settings.use_memory));
        if self.verbose {
            println!(
                "{}",
                style(format!("Full session ID: {}", self.conversation.session_id())).dim()
            );
        }
        println!();
    }

    fn print_logs(&self) {
        let entries = self.conversation.recent_debug_logs();
        if entries.is_empty() {
            self.print_dim("No debug logs");
            return;
        }

        for entry in entries {
            let line = entry.to_string();
            match entry.level {
                DebugLevel::Error => println!("{}", style(line).red()),
                DebugLevel::Success => println!("{}", style(line).green()),
                DebugLevel::Info => println!("{}", style(line).dim()),
            }
        }
    }

    fn server_display(&self) -> &str {
        if self.settings.has_server_url() {
            &self.settings.server_url
        } else {
            "(not set)"
        }
    }

    fn format_prompt(&self) -> String {
        format!("{} ", style("fuse>").cyan().bold())
    }

    fn print_setting(&self, name: &str, value: &str) {
        println!("{}: {}", name, value);
    }

    fn print_dim(&self, msg: &str) {
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(msg));
    }

    fn print_warning(&self, msg: &str) {
        let yellow = Style::new().yellow();
        println!("{} {}", yellow.apply_to("⚠"), msg);
    }

    fn print_error(&self, msg: &str) {
        let red = Style::new().red();
        println!("{} {}", red.apply_to("Error:"), msg);
    }
}

/// Control flow for the REPL.
pub enum ControlFlow {
    Continue,
    Exit,
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn status_badge(status: ConnectionStatus) -> String {
    match status {
        ConnectionStatus::Connected => style(format!("✓ {}", status)).green().to_string(),
        ConnectionStatus::Error => style(format!("✗ {}", status)).red().to_string(),
        ConnectionStatus::Unknown => style(format!("⚬ {}", status)).dim().to_string(),
    }
}

/// Parse an on/off style argument.
fn parse_switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn switch_label(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switch() {
        assert_eq!(parse_switch("on"), Some(true));
        assert_eq!(parse_switch("OFF"), Some(false));
        assert_eq!(parse_switch("yes"), Some(true));
        assert_eq!(parse_switch("maybe"), None);
    }

    #[test]
    fn test_switch_label() {
        assert_eq!(switch_label(true), "on");
        assert_eq!(switch_label(false), "off");
    }
}
