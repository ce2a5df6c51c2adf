use sicasm::assembler::{Assembler, Phase};
use sicasm::error::Error;
use sicasm::operand::{Flag, Operand};
use sicasm::parser::Stmt;

fn src(lines: &[(&str, &str, &str)]) -> Vec<String> {
    lines
        .iter()
        .map(|(label, operator, operand)| format!("{:<8}{:<7}{}", label, operator, operand))
        .collect()
}

fn assemble(lines: &[(&str, &str, &str)]) -> Assembler {
    let lines = src(lines);
    let mut asm = Assembler::new("test.asm", false);
    asm.pass1(&lines);
    asm.pass2();
    asm
}

#[test]
fn scenario_a() {
    let mut asm = assemble(&[
        ("MAIN", "START", "1000"),
        ("FIRST", "LDA", "FIVE"),
        ("FIVE", "WORD", "5"),
        ("", "END", "MAIN"),
    ]);
    assert_eq!(asm.symtab().get("MAIN"), Some(0x1000));
    assert_eq!(asm.symtab().get("FIRST"), Some(0x1000));
    assert_eq!(asm.symtab().get("FIVE"), Some(0x1003));
    assert_eq!(asm.length(), 0x0006);

    let obj = asm.object().unwrap();
    assert!(obj.starts_with("H  MAIN001000000006\n"));
    assert!(obj.contains("T00100006000003000005\n"));
    assert!(obj.ends_with("E001000\n"));
}

#[test]
fn scenario_b_immediate() {
    let asm = assemble(&[("MAIN", "START", "0"), ("", "LDA", "#5")]);
    let Stmt::Inst(inst) = &asm.statements()[1] else {
        panic!("expected instruction");
    };
    assert!(inst.flags.contains(&Flag::Immediate));
    assert_eq!(inst.operands, vec![Operand::Int(5)]);
    // Low opcode bits 01 for immediate addressing.
    assert_eq!(inst.assemble(), "010005");
}

#[test]
fn scenario_c_unknown_operator() {
    let lines = src(&[
        ("MAIN", "START", "1000"),
        ("", "FOOBAR", "X"),
        ("FIRST", "LDA", "#1"),
    ]);
    let mut asm = Assembler::new("test.asm", false);
    asm.pass1(&lines);
    assert!(asm.has_error());
    assert_eq!(asm.errors().len(), 1);
    assert_eq!(asm.errors()[0].0, 2);
    assert!(matches!(asm.errors()[0].1, Error::UnknownOperator(_)));

    // The failed line is absent from the list and contributed no size.
    assert_eq!(asm.statements().len(), 2);
    assert_eq!(asm.symtab().get("FIRST"), Some(0x1000));

    // Phase gate: pass 2 and emission refuse to run after errors.
    asm.pass2();
    assert_eq!(asm.phase(), Phase::Pass1Done);
    assert_eq!(asm.object(), None);
}

#[test]
fn scenario_d_record_break_at_reserve() {
    let mut asm = assemble(&[
        ("MAIN", "START", "1000"),
        ("FIVE", "WORD", "5"),
        ("BUF", "RESB", "10"),
        ("SIX", "WORD", "6"),
        ("", "END", "MAIN"),
    ]);
    let obj = asm.object().unwrap();
    let lines: Vec<&str> = obj.lines().collect();
    assert_eq!(lines[1], "T00100003000005");
    assert_eq!(lines[2], "T00100D03000006");
}

#[test]
fn extended_format_encoding() {
    let asm = assemble(&[
        ("MAIN", "START", "1000"),
        ("", "+JSUB", "SUB"),
        ("", "JSUB", "SUB"),
        ("SUB", "RSUB", ""),
        ("", "END", "MAIN"),
    ]);
    let Stmt::Inst(extended) = &asm.statements()[1] else {
        panic!("expected instruction");
    };
    let Stmt::Inst(plain) = &asm.statements()[2] else {
        panic!("expected instruction");
    };
    assert!(extended.flags.contains(&Flag::Extend));
    assert_eq!(extended.size, 4);
    // 0x100000 set, 20-bit address field: SUB sits at 0x1007.
    assert_eq!(extended.assemble(), "48101007");
    assert!(!plain.flags.contains(&Flag::Extend));
    assert_eq!(plain.size, 3);
    assert_eq!(plain.assemble().len(), 6);
}

#[test]
fn start_sets_symbol_and_counter() {
    let asm = assemble(&[("COPY", "START", "2000"), ("", "RSUB", "")]);
    assert_eq!(asm.symtab().get("COPY"), Some(0x2000));
    assert_eq!(asm.statements()[1].offset(), 0x2000);
    assert_eq!(asm.prog_name(), "COPY");
    assert_eq!(asm.start_addr(), 0x2000);
}

#[test]
fn byte_char_literal_roundtrip() {
    let asm = assemble(&[("MAIN", "START", "0"), ("MSG", "BYTE", "C'TEXT'")]);
    let stmt = &asm.statements()[1];
    assert_eq!(stmt.size(), 4);
    assert_eq!(stmt.assemble(), "54455854");
}

#[test]
fn passes_are_idempotent() {
    let mut asm = assemble(&[
        ("MAIN", "START", "1000"),
        ("FIRST", "LDA", "FIVE"),
        ("FIVE", "WORD", "5"),
    ]);
    let statements: Vec<Stmt> = asm.statements().to_vec();
    let symbols: Vec<(String, u32)> = asm.symtab().iter().map(|(k, v)| (k.clone(), *v)).collect();

    asm.pass1(&src(&[("OTHER", "START", "2000")]));
    asm.pass2();

    assert_eq!(asm.statements(), &statements[..]);
    let after: Vec<(String, u32)> = asm.symtab().iter().map(|(k, v)| (k.clone(), *v)).collect();
    assert_eq!(symbols, after);
}

#[test]
fn text_record_never_exceeds_sixty_hex_chars() {
    let mut program = vec![("MAIN", "START", "0")];
    for _ in 0..25 {
        program.push(("", "WORD", "1"));
    }
    let mut asm = assemble(&program);
    let obj = asm.object().unwrap();
    let records: Vec<&str> = obj.lines().filter(|l| l.starts_with('T')).collect();
    assert_eq!(records.len(), 3);
    for record in records {
        assert!(record.len() <= 9 + 60);
        let count = usize::from_str_radix(&record[7..9], 16).unwrap();
        assert_eq!(count * 2, record.len() - 9);
    }
}

#[test]
fn strict_mode_gates_validation() {
    let lines = src(&[("MAIN", "START", "0"), ("", "ADDR", "A")]);

    let mut lenient = Assembler::new("test.asm", false);
    lenient.pass1(&lines);
    assert!(!lenient.has_error());
    let Stmt::Inst(inst) = &lenient.statements()[1] else {
        panic!("expected instruction");
    };
    assert!(!inst.valid);

    let mut strict = Assembler::new("test.asm", true);
    strict.pass1(&lines);
    assert!(strict.has_error());
    assert!(matches!(strict.errors()[0].1, Error::InvalidOperands(_)));
    // The invalid statement is still recorded for the listing.
    assert_eq!(strict.statements().len(), 2);
}

#[test]
fn unresolved_symbol_is_an_error() {
    let mut asm = assemble(&[("MAIN", "START", "0"), ("", "LDA", "NOWHERE")]);
    assert!(asm.has_error());
    assert!(matches!(asm.errors()[0].1, Error::UnresolvedSymbol(_)));
    assert_eq!(asm.object(), None);
}

#[test]
fn blank_lines_count_for_numbering() {
    let lines = vec![
        format!("{:<8}{:<7}{}", "MAIN", "START", "1000"),
        String::new(),
        format!("{:<8}{:<7}{}", "", "FOOBAR", ""),
    ];
    let mut asm = Assembler::new("test.asm", false);
    asm.pass1(&lines);
    assert_eq!(asm.errors().len(), 1);
    assert_eq!(asm.errors()[0].0, 3);
    assert_eq!(asm.statements().len(), 1);
}

#[test]
fn comment_lines_take_no_space() {
    let lines = vec![
        format!("{:<8}{:<7}{}", "MAIN", "START", "1000"),
        ". whole line comment".to_string(),
        format!("{:<8}{:<7}{}", "FIVE", "WORD", "5"),
    ];
    let mut asm = Assembler::new("test.asm", false);
    asm.pass1(&lines);
    assert!(matches!(asm.statements()[1], Stmt::Comment(_)));
    assert_eq!(asm.symtab().get("FIVE"), Some(0x1000));
}
