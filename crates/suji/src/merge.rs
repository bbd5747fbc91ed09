//! Joining of polylines that share an endpoint pixel.
//!
//! The recursive tracer hands both halves of a split the split line itself,
//! so strokes crossing the boundary show up in each half with the same
//! locator at one end. Merging splices such pairs back together, dropping
//! the duplicated boundary pixel.

use crate::bitimage::Px;

/// How a source polyline attaches to a destination polyline.
enum Splice {
    FrontFront,
    FrontBack,
    BackFront,
    BackBack,
}

fn back(line: &[Px]) -> Px {
    line[line.len() - 1]
}

/// Merge `src` polylines into `dest` polylines wherever endpoints share a
/// pixel locator.
///
/// For each destination the four endpoint pairings are tried in a fixed
/// order (front-front, front-back, back-front, back-back) and the first
/// matching source is spliced in, minus the one shared pixel. Every source
/// merges at most once, and each destination accepts at most one source per
/// pass; chains complete over the merges of enclosing recursion levels.
/// Unmatched sources are appended unchanged.
pub(crate) fn merge_polylines(mut dest: Vec<Vec<Px>>, mut src: Vec<Vec<Px>>) -> Vec<Vec<Px>> {
    if dest.is_empty() {
        return src;
    }
    if src.is_empty() {
        return dest;
    }

    // Matched sources are swapped behind `live` instead of being removed
    // from the middle.
    let mut live = src.len();

    for dest_line in &mut dest {
        let front = dest_line[0];
        let end = back(dest_line);

        let matched = src[..live]
            .iter()
            .position(|s| s[0] == front)
            .map(|i| (i, Splice::FrontFront))
            .or_else(|| {
                src[..live]
                    .iter()
                    .position(|s| back(s) == front)
                    .map(|i| (i, Splice::FrontBack))
            })
            .or_else(|| {
                src[..live]
                    .iter()
                    .position(|s| s[0] == end)
                    .map(|i| (i, Splice::BackFront))
            })
            .or_else(|| {
                src[..live]
                    .iter()
                    .position(|s| back(s) == end)
                    .map(|i| (i, Splice::BackBack))
            });

        let Some((i, splice)) = matched else {
            continue;
        };
        let mut source = std::mem::take(&mut src[i]);

        match splice {
            Splice::FrontFront => {
                // Prepend the source reversed, dropping its front (the
                // shared pixel stays in the destination).
                source.reverse();
                source.pop();
                source.extend_from_slice(dest_line);
                *dest_line = source;
            }
            Splice::FrontBack => {
                source.pop();
                source.extend_from_slice(dest_line);
                *dest_line = source;
            }
            Splice::BackFront => {
                dest_line.extend_from_slice(&source[1..]);
            }
            Splice::BackBack => {
                source.reverse();
                dest_line.extend_from_slice(&source[1..]);
            }
        }

        live -= 1;
        src.swap(i, live);
    }

    src.truncate(live);
    dest.extend(src);
    dest
}
