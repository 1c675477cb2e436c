//! Span merging
//!
//! Coalesces dirty spans when sending their union costs at most `threshold`
//! extra pixels. One forward pass per span; the result is bounded-waste, not
//! minimal.

use crate::diff::{DiffSpan, Rect, SpanList};

/// Union of two spans as (rect, last_scan_right, exact size)
pub fn union(a: &DiffSpan, b: &DiffSpan) -> (Rect, u16, u32) {
    let rect = a.rect.union(&b.rect);
    let last = if a.rect.bottom == b.rect.bottom {
        a.last_scan_right.max(b.last_scan_right)
    } else if a.rect.bottom > b.rect.bottom {
        a.last_scan_right
    } else {
        b.last_scan_right
    };
    (rect, last, DiffSpan::exact_size(&rect, last))
}

/// Pixels sent by the union of `a` and `b` that neither of them covers
///
/// Negative when the spans overlap.
pub fn waste(a: &DiffSpan, b: &DiffSpan) -> i64 {
    let (_, _, size) = union(a, b);
    i64::from(size) - i64::from(a.size) - i64::from(b.size)
}

/// Merge spans of `list` in place, returning how many were removed
///
/// Each span is compared once against the spans after it. A span that grows
/// may become cheap to merge with a span it was already compared against;
/// such pairs are left for the next call, so the result is bounded-waste
/// but not merge-maximal.
///
///     use panel_raster::{merge, DiffSpan, SpanList};
///     let mut list = SpanList::with_capacity(4);
///     list.push(DiffSpan::row(3, 0, 10));
///     list.push(DiffSpan::row(4, 0, 10));
///     list.push(DiffSpan::row(9, 0, 10));
///     assert_eq!(merge(&mut list, 0), 1);
///     assert_eq!(list.len(), 2);
///
pub fn merge(list: &mut SpanList, threshold: u32) -> usize {
    let threshold = i64::from(threshold);
    let mut removed = 0;
    let mut i = list.head;
    while let Some(ii) = i {
        let ii = ii as usize;
        let mut prev = ii;
        let mut j = list.spans[ii].next;
        while let Some(jj) = j {
            let jj = jj as usize;
            let (a, b) = (list.spans[ii], list.spans[jj]);
            // list is sorted by top; nothing later can touch `a`
            if b.rect.top > a.rect.bottom {
                break;
            }
            let (rect, last, size) = union(&a, &b);
            let waste = i64::from(size) - i64::from(a.size) - i64::from(b.size);
            if waste <= threshold {
                log::trace!("MERGE: {:?} + {:?} waste {}", a.rect, b.rect, waste);
                let s = &mut list.spans[ii];
                s.rect = rect;
                s.last_scan_right = last;
                s.size = size;
                list.spans[prev].next = b.next;
                if list.tail == Some(jj as u32) {
                    list.tail = Some(prev as u32);
                }
                list.count -= 1;
                removed += 1;
                j = b.next;
            } else {
                prev = jj;
                j = b.next;
            }
        }
        i = list.spans[ii].next;
    }
    removed
}
