use crate::{label::Labels, parser::Source, parser::Stmt};
use arch::codec::fmt_word;
use color_print::cformat;

/// Annotated listing: slot address, machine word, source line and comment.
pub fn print_dump(src: &Source, labels: &Labels) {
    let rule = "-".repeat(15);
    let tail = 45usize.saturating_sub(src.path.len());
    println!("{}+------[{}]{}", rule, src.path, "-".repeat(tail));

    let mut pc: usize = 0;
    for line in &src.lines {
        let comment = line
            .comment
            .as_ref()
            .map(|s| format!(";{}", s))
            .unwrap_or_default();
        let line_num = line.idx + 1;

        let stmts = match &line.stmts {
            Ok(stmts) => stmts,
            Err(err) => {
                let err = cformat!("<r,s>{}</>", err);
                println!("{:15}| {:>4}: {} {}", "", line_num, err, comment);
                continue;
            }
        };
        if stmts.is_empty() {
            println!("{:15}| {:>4}: {}", "", line_num, comment);
            continue;
        }

        let body = stmts
            .iter()
            .map(|stmt| stmt.cformat(labels))
            .collect::<Vec<_>>()
            .join(" ");

        let words = stmts
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Inst(inst) => Some(fmt_word(inst.to_bin())),
                Stmt::Imm(imm) => Some(match imm.resolve(labels) {
                    Ok(v) => fmt_word(v),
                    Err(_) => cformat!("<r,s>!!!!!!!!</>"),
                }),
                Stmt::Label(_) => None,
            })
            .collect::<Vec<_>>();

        match words.split_first() {
            None => println!("{:15}| {:>4}: {} {}", "", line_num, body, comment),
            Some((first, rest)) => {
                println!("[{:02X}] {} | {:>4}:   {} {}", pc, first, line_num, body, comment);
                for (i, word) in rest.iter().enumerate() {
                    println!("[{:02X}] {} |", pc + i + 1, word);
                }
            }
        }
        pc += words.len();
    }
    println!("{}+{}", rule, "-".repeat(53));
}
