#![forbid(unsafe_code)]

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Delete,
    Insert,
    Replace,
}

/// `old[i1..i2]` becomes `new[j1..j2]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edit {
    Equal,
    Delete,
    Insert,
}

/// Minimal edit script (Myers) folded into opcodes. Adjacent deletes and
/// inserts between two equal runs collapse into a single `Replace`.
pub fn opcodes<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Opcode> {
    let edits = shortest_edit(old, new);
    let mut out = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    let mut cursor = 0usize;

    while cursor < edits.len() {
        if edits[cursor] == Edit::Equal {
            let (i1, j1) = (i, j);
            while cursor < edits.len() && edits[cursor] == Edit::Equal {
                i += 1;
                j += 1;
                cursor += 1;
            }
            out.push(Opcode {
                tag: OpTag::Equal,
                i1,
                i2: i,
                j1,
                j2: j,
            });
            continue;
        }

        let (i1, j1) = (i, j);
        while cursor < edits.len() && edits[cursor] != Edit::Equal {
            match edits[cursor] {
                Edit::Delete => i += 1,
                Edit::Insert => j += 1,
                Edit::Equal => {}
            }
            cursor += 1;
        }
        let tag = match (i > i1, j > j1) {
            (true, true) => OpTag::Replace,
            (true, false) => OpTag::Delete,
            _ => OpTag::Insert,
        };
        out.push(Opcode {
            tag,
            i1,
            i2: i,
            j1,
            j2: j,
        });
    }

    out
}

fn shortest_edit<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Edit> {
    let mut edits = Vec::with_capacity(old.len() + new.len());
    diff_into(old, new, &mut edits);
    edits
}

/// Linear-space Myers: strip the common ends, split the rest at a point on
/// an optimal path, recurse on both halves.
fn diff_into<T: PartialEq>(old: &[T], new: &[T], out: &mut Vec<Edit>) {
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    out.extend(std::iter::repeat_n(Edit::Equal, prefix));
    let (old, new) = (&old[prefix..], &new[prefix..]);

    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let (old, new) = (&old[..old.len() - suffix], &new[..new.len() - suffix]);

    match middle_split(old, new) {
        Some((x, y)) => {
            diff_into(&old[..x], &new[..y], out);
            diff_into(&old[x..], &new[y..], out);
        }
        None => {
            out.extend(std::iter::repeat_n(Edit::Delete, old.len()));
            out.extend(std::iter::repeat_n(Edit::Insert, new.len()));
        }
    }

    out.extend(std::iter::repeat_n(Edit::Equal, suffix));
}

/// Walks forward and reverse D-paths at once until they overlap. Returns a
/// split point strictly inside the edit graph, or `None` when the inputs
/// share nothing (or one side is empty).
fn middle_split<T: PartialEq>(old: &[T], new: &[T]) -> Option<(usize, usize)> {
    if old.is_empty() || new.is_empty() {
        return None;
    }

    let n = old.len() as isize;
    let m = new.len() as isize;
    let max_d = (n + m + 1) / 2;
    let offset = max_d;
    let width = 2 * max_d + 2;
    let mut forward = vec![-1isize; width as usize];
    let mut reverse = vec![-1isize; width as usize];
    forward[(offset + 1) as usize] = 0;
    reverse[(offset + 1) as usize] = 0;

    let delta = n - m;
    let odd = delta % 2 != 0;
    let inside = |x: isize, y: isize| (x > 0 || y > 0) && (x < n || y < m);
    let split = |x: isize, y: isize| {
        (0..=n).contains(&x) && (0..=m).contains(&y) && inside(x, y)
    };

    // Diagonals that ran off the grid are dropped from later rounds.
    let (mut f_start, mut f_end, mut r_start, mut r_end) = (0isize, 0isize, 0isize, 0isize);

    for d in 0..max_d {
        let mut k = -d + f_start;
        while k <= d - f_end {
            let at = (offset + k) as usize;
            let mut x = if k == -d || (k != d && forward[at - 1] < forward[at + 1]) {
                forward[at + 1]
            } else {
                forward[at - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && old[x as usize] == new[y as usize] {
                x += 1;
                y += 1;
            }
            forward[at] = x;
            if x > n {
                f_end += 2;
            } else if y > m {
                f_start += 2;
            } else if odd {
                let mirror = offset + delta - k;
                if (0..width).contains(&mirror) && reverse[mirror as usize] != -1 {
                    let reached = n - reverse[mirror as usize];
                    if x >= reached && split(x, y) {
                        return Some((x as usize, y as usize));
                    }
                }
            }
            k += 2;
        }

        let mut k = -d + r_start;
        while k <= d - r_end {
            let at = (offset + k) as usize;
            let mut x = if k == -d || (k != d && reverse[at - 1] < reverse[at + 1]) {
                reverse[at + 1]
            } else {
                reverse[at - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && old[(n - x - 1) as usize] == new[(m - y - 1) as usize] {
                x += 1;
                y += 1;
            }
            reverse[at] = x;
            if x > n {
                r_end += 2;
            } else if y > m {
                r_start += 2;
            } else if !odd {
                let mirror = offset + delta - k;
                if (0..width).contains(&mirror) && forward[mirror as usize] != -1 {
                    let fx = forward[mirror as usize];
                    let fy = fx - (delta - k);
                    if fx >= n - x && split(fx, fy) {
                        return Some((fx as usize, fy as usize));
                    }
                }
            }
            k += 2;
        }
    }

    None
}
