use arch::errno;
use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed label or operator field, carrying its catalog code.
    #[error("{}", errno::message(*.0))]
    Syntax(u8),

    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    /// START structural violation, catalog codes 2-4.
    #[error("{}", errno::message(*.0))]
    Directive(u8),

    #[error("invalid extend flag for operator `{0}`")]
    InvalidExtendFlag(String),

    #[error("operand mismatch: {0}")]
    InvalidOperands(String),

    #[error("undefined symbol `{0}`")]
    UnresolvedSymbol(String),
}

impl Error {
    /// Print the error with file location and line content.
    pub fn print_diag(&self, path: &str, lineno: usize, raw: &str) {
        cprintln!("<red,bold>error</>: {}", self);
        cprintln!("     <blue>--></> <underline>{}:{}</>", path, lineno);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", lineno, raw);
        cprintln!("      <blue>|</>");
    }
}
