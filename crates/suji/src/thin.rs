//! In-place skeletonisation with the Zhang-Suen two-pass thinning
//! iteration.
//!
//! Each round flags deletable pixels against the unchanged pre-round image
//! and then clears them all at once, alternating between the two
//! sub-iteration rule sets until a full round flags nothing. Only bits can
//! flip from on to off; border pixels are never candidates.

use crate::bitimage::BitImage;

/// Thin the image to a one-pixel-wide skeleton.
///
/// Images with fewer than 3 rows or columns have no interior and are left
/// untouched.
pub fn thin(image: &mut BitImage) {
    if image.rows() < 3 || image.cols() < 3 {
        return;
    }

    // Working set of interior pixels still on; shrinks as rounds clear bits.
    let mut working = image.section(1, 1, image.rows() - 2, image.cols() - 2);
    let mut second_pass = false;

    loop {
        working.retain(|&px| image.is_on(px));

        let mut flagged = Vec::with_capacity(working.len());
        for &px in &working {
            let (r, c) = image.coords(px);

            // 8-neighbourhood, clockwise from north.
            let p2 = image.is_on(image.locator(r - 1, c));
            let p3 = image.is_on(image.locator(r - 1, c + 1));
            let p4 = image.is_on(image.locator(r, c + 1));
            let p5 = image.is_on(image.locator(r + 1, c + 1));
            let p6 = image.is_on(image.locator(r + 1, c));
            let p7 = image.is_on(image.locator(r + 1, c - 1));
            let p8 = image.is_on(image.locator(r, c - 1));
            let p9 = image.is_on(image.locator(r - 1, c - 1));

            // Off-to-on transitions around the cycle p2, p3, ..., p9, p2.
            let transitions = u32::from(!p2 && p3)
                + u32::from(!p3 && p4)
                + u32::from(!p4 && p5)
                + u32::from(!p5 && p6)
                + u32::from(!p6 && p7)
                + u32::from(!p7 && p8)
                + u32::from(!p8 && p9)
                + u32::from(!p9 && p2);

            let neighbours = u32::from(p2)
                + u32::from(p3)
                + u32::from(p4)
                + u32::from(p5)
                + u32::from(p6)
                + u32::from(p7)
                + u32::from(p8)
                + u32::from(p9);

            let (m1, m2) = if second_pass {
                (p2 && p4 && p8, p2 && p6 && p8)
            } else {
                (p2 && p4 && p6, p4 && p6 && p8)
            };

            if transitions == 1 && (2..=6).contains(&neighbours) && !m1 && !m2 {
                flagged.push(px);
            }
        }

        if flagged.is_empty() {
            break;
        }
        for &px in &flagged {
            image.set(px, false);
        }
        second_pass = !second_pass;
    }
}
