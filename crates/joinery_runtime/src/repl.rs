//! The interactive query loop.
//!
//! Lines starting with `:` are commands; anything else is a free-text
//! search run through the configured strategy.

use joinery_foundation::{QueryPart, QueryResults, Result, Schema};
use joinery_search::execute;

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::session::Session;

const COMMANDS: &[&str] = &[
    ":sources", ":schema", ":find", ":key", ":contents", ":help", ":quit",
];

const HELP: &str = "\
<words>                           search with the configured strategy
:sources                          list datasources
:schema <source>                  show the columns of a datasource
:find <source> <col>=<pattern>... query a datasource directly
:key <source> <key>               fetch a row by key
:contents <source>                list every row of a datasource
:help                             show this help
:quit                             leave";

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Loaded datasources and search templates.
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL over `session` with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(session: Session) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, session))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL with the given editor.
    pub fn with_editor(mut editor: E, session: Session) -> Self {
        let keywords = COMMANDS
            .iter()
            .map(ToString::to_string)
            .chain(session.registry().names().map(String::from))
            .collect();
        editor.set_keywords(keywords);
        Self {
            editor,
            session,
            show_banner: true,
            prompt: "joinery> ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the REPL loop until `:quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            println!("Joinery v{}", env!("CARGO_PKG_VERSION"));
            println!("Type words to search, :help for commands, Ctrl+D to exit.\n");
        }

        loop {
            match self.editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.editor.add_history(line);
                    match self.eval(line) {
                        Ok(Some(output)) => println!("{output}"),
                        Ok(None) => break,
                        Err(e) => eprintln!("\x1b[31mError: {e}\x1b[0m"),
                    }
                }
                ReadResult::Interrupted => println!(),
                ReadResult::Eof => break,
            }
        }
        Ok(())
    }

    /// Evaluates one line and returns the text to print, or `None` to quit.
    ///
    /// # Errors
    ///
    /// Fails if the line names an unknown datasource.
    pub fn eval(&self, input: &str) -> Result<Option<String>> {
        let mut words = input.split_whitespace();
        let Some(command) = words.next().filter(|w| w.starts_with(':')) else {
            return self.search(input).map(Some);
        };
        let args: Vec<&str> = words.collect();

        let output = match (command, args.as_slice()) {
            (":quit" | ":q", _) => return Ok(None),
            (":help", _) => HELP.to_string(),
            (":sources", _) => self.sources(),
            (":schema", [name]) => self.session.datasource(name)?.schema().columns().join(", "),
            (":find", [name, parts @ ..]) if !parts.is_empty() => {
                let Some(query) = parse_parts(parts) else {
                    return Ok(Some("usage: :find <source> <column>=<pattern>...".to_string()));
                };
                let source = self.session.datasource(name)?;
                format_results(source.schema(), &source.find(&query))
            }
            (":key", [name, key]) => {
                let source = self.session.datasource(name)?;
                format_results(source.schema(), &source.datasets_by_key(&[(*key).to_string()]))
            }
            (":contents", [name]) => {
                let source = self.session.datasource(name)?;
                format_results(source.schema(), &source.contents())
            }
            (c, _) if COMMANDS.contains(&c) => format!("wrong arguments for {c}, see :help"),
            (c, _) => format!("unknown command {c}, see :help"),
        };
        Ok(Some(output))
    }

    fn sources(&self) -> String {
        let registry = self.session.registry();
        let lines: Vec<String> = registry
            .names()
            .filter_map(|name| registry.get(name))
            .map(|source| format!("{} ({} columns)", source.name(), source.schema().len()))
            .collect();
        lines.join("\n")
    }

    fn search(&self, input: &str) -> Result<String> {
        let queries = self.session.strategy().resolve(input);
        if queries.is_empty() {
            return Ok("no search template fits this input".to_string());
        }
        let mut columns = Schema::new();
        for query in &queries {
            let source = self.session.datasource(&query.datasource)?;
            for column in source.schema() {
                columns.push_unique(column.as_str());
            }
        }
        let results = execute(&queries, self.session.registry())?;
        Ok(format_results(&columns, &results))
    }
}

fn parse_parts(args: &[&str]) -> Option<Vec<QueryPart>> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(column, pattern)| QueryPart::new(column, pattern))
        })
        .collect()
}

/// Renders rows as an aligned text table followed by a row count.
#[must_use]
pub fn format_results(schema: &Schema, results: &QueryResults) -> String {
    let header: Vec<String> = schema.iter().map(String::from).collect();
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|ds| {
            schema
                .iter()
                .map(|column| ds.value(column).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&render(&header));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &rows {
        out.push_str(&render(row));
        out.push('\n');
    }
    let count = results.len();
    out.push_str(&format!("({count} row{})", if count == 1 { "" } else { "s" }));
    out
}
