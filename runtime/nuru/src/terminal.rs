//! The `ITerminal`-equivalent surface (§4.7.6, §9 "global mutable state").
//!
//! Only the method surface below is ever consumed by the emitted dispatcher — real
//! terminal rendering (cursor movement, resizing, raw mode) is explicitly out of
//! scope (§1 "Out of scope"). [`DefaultTerminal`] is a thin wrapper over stdout/stderr
//! good enough to drive help/version/capabilities output and handler `WriteLine`
//! calls; anything fancier is a host-program concern.

use std::fmt::Display;

use owo_colors::OwoColorize;

/// A row of cells for [`Terminal::write_table`].
pub type TableRow = Vec<String>;

/// Column header visibility for [`Terminal::write_table`]; help output always uses
/// [`TableOptions::hide_headers`] (§4.7.5: "table rendering delegated to
/// `ITerminal.WriteTable` with `HideHeaders()` set").
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOptions {
    headers_hidden: bool,
}

impl TableOptions {
    pub fn hide_headers(mut self) -> Self {
        self.headers_hidden = true;
        self
    }
}

/// Everything a handler or the generated dispatcher can do to the user-facing
/// terminal. Implementations only need to be correct for the method surface actually
/// called — there is no requirement to model a full terminal emulator.
pub trait Terminal: Send + Sync {
    fn write_line(&self, text: &str);
    fn write_error_line(&self, text: &str);
    fn write(&self, text: &str);
    fn write_table(&self, headers: &[&str], rows: &[TableRow], options: TableOptions);
}

/// Resolution order for `ITerminal` handler parameters (§4.7.6): an async-local test
/// override first, the registered service second, a process-wide default third.
/// [`Terminal::current`] implements exactly that chain; the generated dispatcher
/// never constructs a [`DefaultTerminal`] directly.
pub struct DefaultTerminal;

impl Terminal for DefaultTerminal {
    fn write_line(&self, text: &str) {
        println!("{text}");
    }

    fn write_error_line(&self, text: &str) {
        eprintln!("{}", text.red());
    }

    fn write(&self, text: &str) {
        print!("{text}");
    }

    fn write_table(&self, headers: &[&str], rows: &[TableRow], options: TableOptions) {
        if !options.headers_hidden && !headers.is_empty() {
            println!("{}", headers.join("  ").bold());
        }
        for row in rows {
            println!("{}", row.join("  "));
        }
    }
}

/// An in-memory terminal a test installs via [`with_test_terminal`] to assert on a
/// handler's output without capturing real stdout (§9: "Tests that need to observe
/// handler-side state should use a test terminal and assert on its output").
#[derive(Default)]
pub struct TestTerminal {
    lines: std::sync::Mutex<Vec<String>>,
}

impl TestTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("TestTerminal lock poisoned")
            .clone()
    }
}

impl Terminal for TestTerminal {
    fn write_line(&self, text: &str) {
        self.lines
            .lock()
            .expect("TestTerminal lock poisoned")
            .push(text.to_string());
    }

    fn write_error_line(&self, text: &str) {
        self.write_line(text);
    }

    fn write(&self, text: &str) {
        let mut lines = self.lines.lock().expect("TestTerminal lock poisoned");
        match lines.last_mut() {
            Some(last) => last.push_str(text),
            None => lines.push(text.to_string()),
        }
    }

    fn write_table(&self, _headers: &[&str], rows: &[TableRow], _options: TableOptions) {
        for row in rows {
            self.write_line(&row.join("  "));
        }
    }
}

thread_local! {
    static TEST_OVERRIDE: std::cell::RefCell<Option<std::sync::Arc<dyn Terminal>>> =
        const { std::cell::RefCell::new(None) };
}

/// Install `terminal` as the current thread's terminal for the duration of `f`,
/// restoring whatever was there before on the way out. This is the flow-local
/// equivalent of the host framework's `AsyncLocal<ITerminal>` test hook (§9).
pub fn with_test_terminal<R>(terminal: std::sync::Arc<dyn Terminal>, f: impl FnOnce() -> R) -> R {
    let previous = TEST_OVERRIDE.with(|cell| cell.borrow_mut().replace(terminal));
    let result = f();
    TEST_OVERRIDE.with(|cell| *cell.borrow_mut() = previous);
    result
}

/// Resolve the terminal the current call should write to: the test override if one is
/// installed, otherwise the process-wide [`DefaultTerminal`].
pub fn current() -> std::sync::Arc<dyn Terminal> {
    TEST_OVERRIDE.with(|cell| cell.borrow().clone())
        .unwrap_or_else(|| std::sync::Arc::new(DefaultTerminal))
}

/// Render a value the way the emitted dispatcher renders a handler's return value
/// (§6.3: handler return values are formatted as output, never used as the exit code).
pub fn format_return_value(value: &impl Display) -> String {
    value.to_string()
}
