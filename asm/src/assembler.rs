use arch::dir::DirKind;
use color_print::cprintln;

use crate::error::Error;
use crate::msg::Msg;
use crate::object;
use crate::operand::Operand;
use crate::parser::Stmt;
use crate::symtab::SymTab;

// ----------------------------------------------------------------------------
// Phase

/// Pipeline phases. Transitions are strictly sequential; pass 2 and object
/// generation refuse to run out of order or once an error is accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fresh,
    Pass1Done,
    Pass2Done,
    ObjectGenerated,
}

// ----------------------------------------------------------------------------
// Assembler

pub struct Assembler {
    path: String,
    strict: bool,
    phase: Phase,
    lines: Vec<String>,
    list: Vec<Stmt>,
    symtab: SymTab,
    prog_name: String,
    start_addr: u32,
    locctr: u32,
    linecnt: usize,
    has_error: bool,
    errors: Vec<(usize, Error)>,
}

impl Assembler {
    pub fn new(path: &str, strict: bool) -> Self {
        Self {
            path: path.to_string(),
            strict,
            phase: Phase::Fresh,
            lines: Vec::new(),
            list: Vec::new(),
            symtab: SymTab::new(),
            prog_name: String::new(),
            start_addr: 0,
            locctr: 0,
            linecnt: 0,
            has_error: false,
            errors: Vec::new(),
        }
    }

    /// Pass 1: parse each line, assign addresses, collect the symbol table.
    /// Failed lines are reported and skipped but still count for line
    /// numbering; they never advance the program counter.
    pub fn pass1(&mut self, lines: &[String]) {
        if self.phase != Phase::Fresh {
            cprintln!("<yellow,bold>warn</>: pass 1 already ran, ignored");
            return;
        }
        self.lines = lines.to_vec();
        for raw in lines {
            self.linecnt += 1;
            if raw.trim().is_empty() {
                continue;
            }
            let stmt = match Stmt::parse(self.linecnt, raw, self.locctr) {
                Ok(stmt) => stmt,
                Err(err) => {
                    err.print_diag(&self.path, self.linecnt, raw);
                    self.errors.push((self.linecnt, err));
                    self.has_error = true;
                    continue;
                }
            };

            if let Stmt::Inst(inst) = &stmt {
                if !inst.valid {
                    let detail = inst.diag.clone().unwrap_or_default();
                    if self.strict {
                        let err = Error::InvalidOperands(detail);
                        err.print_diag(&self.path, self.linecnt, raw);
                        self.errors.push((self.linecnt, err));
                        self.has_error = true;
                        // The statement stays in the list for the listing.
                    } else {
                        Msg::Warn(format!("operand mismatch: {}", detail)).diag(
                            &self.path,
                            self.linecnt,
                            raw,
                        );
                    }
                }
            }

            if let Stmt::Dir(dir) = &stmt {
                if dir.kind == DirKind::START {
                    self.prog_name = dir.label.clone().unwrap_or_default();
                    self.start_addr = dir.offset;
                }
            }

            if let Some(label) = stmt.label() {
                if let Some(prev) = self.symtab.insert(label, stmt.offset()) {
                    Msg::Warn(format!("label `{}` redefined (was {:04X})", label, prev)).diag(
                        &self.path,
                        self.linecnt,
                        raw,
                    );
                }
            }

            self.locctr += stmt.size();
            self.list.push(stmt);
        }
        self.phase = Phase::Pass1Done;
    }

    /// Pass 2: rewrite symbolic instruction operands into resolved
    /// addresses. Unknown symbols are reported as errors instead of
    /// silently encoding as zero.
    pub fn pass2(&mut self) {
        if self.phase != Phase::Pass1Done {
            cprintln!("<yellow,bold>warn</>: pass 2 requires a completed pass 1, ignored");
            return;
        }
        if self.has_error {
            cprintln!("<red,bold>error</>: pass 1 accumulated errors, pass 2 skipped");
            return;
        }
        for stmt in &mut self.list {
            let Stmt::Inst(inst) = stmt else { continue };
            for opnd in &mut inst.operands {
                let Operand::Sym(name) = opnd else { continue };
                match self.symtab.get(name) {
                    Some(addr) => *opnd = Operand::Int(addr),
                    None => {
                        let err = Error::UnresolvedSymbol(name.clone());
                        let raw = self.lines.get(inst.lineno - 1).cloned().unwrap_or_default();
                        err.print_diag(&self.path, inst.lineno, &raw);
                        self.errors.push((inst.lineno, err));
                        self.has_error = true;
                    }
                }
            }
        }
        self.phase = Phase::Pass2Done;
    }

    /// Render the object records. Refused until pass 2 completed cleanly.
    pub fn object(&mut self) -> Option<String> {
        if self.phase != Phase::Pass2Done {
            cprintln!("<yellow,bold>warn</>: object generation requires a completed pass 2, ignored");
            return None;
        }
        if self.has_error {
            cprintln!("<red,bold>error</>: assembly failed, no object generated");
            return None;
        }
        let obj = object::emit(&self.list, &self.prog_name, self.start_addr, self.length());
        self.phase = Phase::ObjectGenerated;
        Some(obj)
    }

    /// Program length: final program counter minus the start address.
    pub fn length(&self) -> u32 {
        self.locctr.saturating_sub(self.start_addr)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.list
    }

    pub fn symtab(&self) -> &SymTab {
        &self.symtab
    }

    pub fn errors(&self) -> &[(usize, Error)] {
        &self.errors
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn prog_name(&self) -> &str {
        &self.prog_name
    }

    pub fn start_addr(&self) -> u32 {
        self.start_addr
    }
}
