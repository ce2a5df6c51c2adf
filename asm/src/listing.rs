use crate::parser::Stmt;

/// Plain listing: offset, object code, label, operator, operand, comment.
pub fn render(list: &[Stmt]) -> String {
    let mut out = String::new();
    for stmt in list {
        out.push_str(line(stmt).trim_end());
        out.push('\n');
    }
    out
}

fn line(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Comment(c) => format!("{:21}{}", "", c.content),
        _ => format!(
            "{:04X}  {:<14} {:<8} {:<7} {:<19} {}",
            stmt.offset(),
            stmt.assemble(),
            stmt.label().unwrap_or(""),
            stmt.operator_text(),
            stmt.operand_text(),
            stmt.comment_text(),
        ),
    }
}

/// Colored listing on stdout.
pub fn dump(list: &[Stmt]) {
    for stmt in list {
        println!("{}", stmt.cformat());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_line_up() {
        let list = vec![
            Stmt::parse(1, &format!("{:<8}{:<7}{}", "MAIN", "START", "1000"), 0).unwrap(),
            Stmt::parse(2, &format!("{:<8}{:<7}{}", "FIVE", "WORD", "5"), 0x1000).unwrap(),
        ];
        let text = render(&list);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("1000"));
        assert!(lines[0].contains("START"));
        assert!(lines[1].starts_with("1000  000005"));
        assert!(lines[1].contains("WORD"));
    }
}
