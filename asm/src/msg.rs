use color_print::cprintln;

/// Non-fatal diagnostics. Errors go through `error::Error`.
#[derive(Debug)]
pub enum Msg {
    Warn(String),
    Note(String),
}

impl Msg {
    pub fn diag(&self, path: &str, lineno: usize, raw: &str) {
        match self {
            Msg::Warn(msg) => cprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cprintln!("<green,bold>note</>: {}", msg),
        }
        cprintln!("     <blue>--></> <underline>{}:{}</>", path, lineno);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", lineno, raw);
        cprintln!("      <blue>|</>");
    }
}
