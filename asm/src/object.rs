use crate::parser::Stmt;

/// Hex characters of object code a Text record can hold.
const TEXT_LIMIT: usize = 60;

/// Render Header, Text and End records for a resolved statement list.
///
/// A Text record breaks when the next statement would overflow it and at
/// every reserve directive once the record holds bytes; reserved storage
/// never straddles a record and contributes no bytes of its own.
pub fn emit(list: &[Stmt], name: &str, start: u32, length: u32) -> String {
    let mut out = String::new();
    let mut prog = name.to_string();
    prog.truncate(6);
    out.push_str(&format!("H{:>6}{:06X}{:06X}\n", prog, start, length));

    let mut rec = String::new();
    let mut rec_start = start;
    for stmt in list {
        if let Stmt::Comment(_) = stmt {
            continue;
        }
        if stmt.is_reserve() {
            flush(&mut out, &mut rec, rec_start);
            continue;
        }
        let bytes = stmt.assemble();
        if bytes.is_empty() {
            continue;
        }
        if !rec.is_empty() && rec.len() + bytes.len() > TEXT_LIMIT {
            flush(&mut out, &mut rec, rec_start);
        }
        if rec.is_empty() {
            rec_start = stmt.offset();
        }
        // A single emission longer than a whole record is split.
        let mut rest = bytes.as_str();
        while rest.len() > TEXT_LIMIT - rec.len() {
            let (head, tail) = rest.split_at(TEXT_LIMIT - rec.len());
            rec.push_str(head);
            let next = rec_start + (rec.len() / 2) as u32;
            flush(&mut out, &mut rec, rec_start);
            rec_start = next;
            rest = tail;
        }
        rec.push_str(rest);
    }
    flush(&mut out, &mut rec, rec_start);

    out.push_str(&format!("E{:06X}\n", start));
    out
}

fn flush(out: &mut String, rec: &mut String, start: u32) {
    if rec.is_empty() {
        return;
    }
    out.push_str(&format!("T{:06X}{:02X}{}\n", start, rec.len() / 2, rec));
    rec.clear();
}
