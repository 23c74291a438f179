#![forbid(unsafe_code)]

use super::myers::{OpTag, Opcode, opcodes};
use super::split_lines_keep_ends;

pub const DEFAULT_CONTEXT: usize = 3;

/// Unified diff of `old` against `new`, one entry per output line.
///
/// Header lines (`---`, `+++`, `@@`) carry no terminator; content lines keep
/// the terminator of the source line. Equal inputs yield no lines at all.
pub fn unified_diff(
    old: &str,
    new: &str,
    from_label: &str,
    to_label: &str,
    context: usize,
) -> Vec<String> {
    let a = split_lines_keep_ends(old);
    let b = split_lines_keep_ends(new);
    let codes = opcodes(&a, &b);

    let mut out = Vec::new();
    for group in grouped(codes, context) {
        if out.is_empty() {
            out.push(format!("--- {from_label}"));
            out.push(format!("+++ {to_label}"));
        }
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        out.push(format!(
            "@@ -{} +{} @@",
            format_range(first.i1, last.i2),
            format_range(first.j1, last.j2)
        ));
        for op in &group {
            match op.tag {
                OpTag::Equal => {
                    out.extend(a[op.i1..op.i2].iter().map(|line| format!(" {line}")));
                }
                OpTag::Delete => {
                    out.extend(a[op.i1..op.i2].iter().map(|line| format!("-{line}")));
                }
                OpTag::Insert => {
                    out.extend(b[op.j1..op.j2].iter().map(|line| format!("+{line}")));
                }
                OpTag::Replace => {
                    out.extend(a[op.i1..op.i2].iter().map(|line| format!("-{line}")));
                    out.extend(b[op.j1..op.j2].iter().map(|line| format!("+{line}")));
                }
            }
        }
    }
    out
}

fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    match length {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{length}", start + 1),
    }
}

/// Splits the opcode stream into hunks separated by more than `2 * context`
/// unchanged lines, trimming leading and trailing context to `context`.
fn grouped(mut codes: Vec<Opcode>, context: usize) -> Vec<Vec<Opcode>> {
    if codes.is_empty() {
        codes.push(Opcode {
            tag: OpTag::Equal,
            i1: 0,
            i2: 1,
            j1: 0,
            j2: 1,
        });
    }
    if let Some(first) = codes.first_mut()
        && first.tag == OpTag::Equal
    {
        first.i1 = first.i1.max(first.i2.saturating_sub(context));
        first.j1 = first.j1.max(first.j2.saturating_sub(context));
    }
    if let Some(last) = codes.last_mut()
        && last.tag == OpTag::Equal
    {
        last.i2 = last.i2.min(last.i1 + context);
        last.j2 = last.j2.min(last.j1 + context);
    }

    let span = context * 2;
    let mut groups = Vec::new();
    let mut group = Vec::new();
    for mut op in codes {
        if op.tag == OpTag::Equal && op.i2 - op.i1 > span {
            group.push(Opcode {
                tag: OpTag::Equal,
                i1: op.i1,
                i2: op.i2.min(op.i1 + context),
                j1: op.j1,
                j2: op.j2.min(op.j1 + context),
            });
            groups.push(std::mem::take(&mut group));
            op.i1 = op.i1.max(op.i2.saturating_sub(context));
            op.j1 = op.j1.max(op.j2.saturating_sub(context));
        }
        group.push(op);
    }
    if !group.is_empty() && !(group.len() == 1 && group[0].tag == OpTag::Equal) {
        groups.push(group);
    }
    groups
}
