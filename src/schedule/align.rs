//! Combining mortgages whose fixed periods end at different months
//!
//! Two schedules partition the same time axis with their own period
//! boundaries. The combined schedule breaks at the union of both sets of
//! boundaries and pays the sum of whichever segments are active.

use super::data::{MortgageSchedule, Segment};

/// Merge two segment sequences into one with summed payments
///
/// Walks both sequences with one cursor each. The shorter head is emitted in
/// full, the longer head keeps its payment and is shortened by the same number
/// of months. Once one side runs out, the rest of the other side is appended
/// unchanged. Zero-length segments cover no months and are dropped.
pub fn align_segments(a: &[Segment], b: &[Segment]) -> Vec<Segment> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut rest_a = a.iter().copied().filter(|s| s.months > 0);
    let mut rest_b = b.iter().copied().filter(|s| s.months > 0);
    let mut head_a = rest_a.next();
    let mut head_b = rest_b.next();

    loop {
        match (head_a, head_b) {
            (None, None) => break,
            (Some(tail), None) => {
                out.push(tail);
                out.extend(rest_a.by_ref());
                break;
            }
            (None, Some(tail)) => {
                out.push(tail);
                out.extend(rest_b.by_ref());
                break;
            }
            (Some(seg_a), Some(seg_b)) => {
                let months = seg_a.months.min(seg_b.months);
                out.push(Segment::new(months, seg_a.payment + seg_b.payment));

                head_a = if seg_a.months == months {
                    rest_a.next()
                } else {
                    Some(Segment::new(seg_a.months - months, seg_a.payment))
                };
                head_b = if seg_b.months == months {
                    rest_b.next()
                } else {
                    Some(Segment::new(seg_b.months - months, seg_b.payment))
                };
            }
        }
    }

    log::trace!("aligned {} + {} segments into {}", a.len(), b.len(), out.len());
    out
}

/// Combine two schedules into one covering both mortgages
///
/// Amounts and burdens add up, segments are aligned with [`align_segments`].
/// An empty schedule on either side is the identity. Differing labels are
/// joined with `" & "`, equal labels are kept once. Zero-length segments are
/// dropped on every path.
pub fn combine(a: &MortgageSchedule, b: &MortgageSchedule) -> MortgageSchedule {
    if b.is_empty() {
        return without_empty_segments(a);
    }
    if a.is_empty() {
        return without_empty_segments(b);
    }

    let label = if a.label() == b.label() {
        a.label().to_string()
    } else {
        format!("{} & {}", a.label(), b.label())
    };

    MortgageSchedule::new(
        label,
        a.total_amount() + b.total_amount(),
        a.total_burden() + b.total_burden(),
        align_segments(a.segments(), b.segments()),
    )
}

fn without_empty_segments(schedule: &MortgageSchedule) -> MortgageSchedule {
    MortgageSchedule::new(
        schedule.label(),
        schedule.total_amount(),
        schedule.total_burden(),
        align_segments(schedule.segments(), &[]),
    )
}

/// Fold any number of schedules into one, starting from the empty schedule
///
/// An empty collection yields [`MortgageSchedule::impossible`].
pub fn combine_all<'a, I>(schedules: I) -> MortgageSchedule
where
    I: IntoIterator<Item = &'a MortgageSchedule>,
{
    schedules
        .into_iter()
        .fold(MortgageSchedule::impossible(), |acc, next| combine(&acc, next))
}

impl MortgageSchedule {
    /// Method form of [`combine`]
    pub fn combine(&self, other: &MortgageSchedule) -> MortgageSchedule {
        combine(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(pairs: &[(u32, u64)]) -> Vec<Segment> {
        pairs.iter().map(|&(m, p)| Segment::new(m, p)).collect()
    }

    fn schedule(label: &str, amount: u64, burden: u64, pairs: &[(u32, u64)]) -> MortgageSchedule {
        MortgageSchedule::new(label, amount, burden, segs(pairs))
    }

    #[test]
    fn test_single_segment_spans_both() {
        let a = segs(&[(12, 500), (24, 600)]);
        let b = segs(&[(36, 1100)]);
        assert_eq!(align_segments(&a, &b), segs(&[(12, 1600), (24, 1700)]));
        assert_eq!(align_segments(&b, &a), segs(&[(12, 1600), (24, 1700)]));
    }

    #[test]
    fn test_staggered_boundaries() {
        let a = segs(&[(10, 100), (20, 200)]);
        let b = segs(&[(15, 50), (15, 80)]);
        let expected = segs(&[(10, 150), (5, 180), (15, 280)]);
        assert_eq!(align_segments(&a, &b), expected);
        assert_eq!(align_segments(&b, &a), expected);
    }

    #[test]
    fn test_equal_boundaries() {
        let a = segs(&[(120, 800), (240, 900)]);
        let b = segs(&[(120, 300), (240, 350)]);
        assert_eq!(align_segments(&a, &b), segs(&[(120, 1100), (240, 1250)]));
    }

    #[test]
    fn test_differing_totals_keep_tail() {
        let a = segs(&[(10, 100)]);
        let b = segs(&[(5, 20), (10, 30), (5, 40)]);
        let merged = align_segments(&a, &b);
        assert_eq!(merged, segs(&[(5, 120), (5, 130), (5, 30), (5, 40)]));
        assert_eq!(merged.iter().map(|s| s.months).sum::<u32>(), 20);
    }

    #[test]
    fn test_empty_side_returns_other() {
        let a = segs(&[(10, 100), (20, 200)]);
        assert_eq!(align_segments(&a, &[]), a);
        assert_eq!(align_segments(&[], &a), a);
        assert!(align_segments(&[], &[]).is_empty());
    }

    #[test]
    fn test_zero_length_segments_dropped() {
        let a = segs(&[(0, 999), (10, 100)]);
        let b = segs(&[(10, 50), (0, 7)]);
        assert_eq!(align_segments(&a, &b), segs(&[(10, 150)]));
    }

    #[test]
    fn test_combine_additivity_and_label() {
        let a = schedule("Bank A", 200_000, 260_000, &[(120, 800), (240, 700)]);
        let b = schedule("Bank B", 100_000, 130_000, &[(60, 400), (300, 380)]);

        let ab = combine(&a, &b);
        let ba = combine(&b, &a);

        assert_eq!(ab.total_amount(), 300_000);
        assert_eq!(ab.total_burden(), 390_000);
        assert_eq!(ab.label(), "Bank A & Bank B");
        assert_eq!(ba.label(), "Bank B & Bank A");
        assert_eq!(ab.segments(), ba.segments());
        assert_eq!(ab.duration(), 360);
        assert_eq!(ab.segments(), &segs(&[(60, 1200), (60, 1180), (240, 1080)])[..]);
    }

    #[test]
    fn test_combine_same_label_not_duplicated() {
        let a = schedule("Mortgage", 1, 2, &[(10, 1)]);
        let b = schedule("Mortgage", 3, 4, &[(10, 2)]);
        assert_eq!(combine(&a, &b).label(), "Mortgage");
    }

    #[test]
    fn test_combine_identity() {
        let a = schedule("Bank A", 200_000, 260_000, &[(120, 800), (240, 700)]);
        let empty = MortgageSchedule::impossible();
        assert_eq!(combine(&a, &empty), a);
        assert_eq!(combine(&empty, &a), a);
        assert_eq!(a.combine(&empty), a);
    }

    #[test]
    fn test_identity_drops_zero_length_segments_too() {
        let a = schedule("A", 10, 20, &[(0, 999), (10, 100), (0, 5), (20, 200)]);
        let b = schedule("B", 10, 20, &[(30, 1)]);
        let empty = MortgageSchedule::impossible();

        let expected = segs(&[(10, 100), (20, 200)]);
        assert_eq!(combine(&a, &empty).segments(), &expected[..]);
        assert_eq!(combine(&empty, &a).segments(), &expected[..]);
        assert_eq!(combine(&a, &empty).label(), "A");
        assert!(combine(&a, &b).segments().iter().all(|s| s.months > 0));
        assert_eq!(combine(&a, &b).segments(), &segs(&[(10, 101), (20, 201)])[..]);
    }

    #[test]
    fn test_combine_leaves_inputs_untouched() {
        let a = schedule("A", 10, 20, &[(10, 100), (20, 200)]);
        let b = schedule("B", 10, 20, &[(15, 50), (15, 80)]);
        let a_before = a.clone();
        let b_before = b.clone();
        let _ = combine(&a, &b);
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn test_combine_all_order_independent() {
        let a = schedule("A", 100, 150, &[(10, 100), (20, 200)]);
        let b = schedule("B", 200, 250, &[(15, 50), (15, 80)]);
        let c = schedule("C", 300, 350, &[(5, 1), (25, 2)]);

        let abc = combine_all([&a, &b, &c]);
        let cba = combine_all([&c, &b, &a]);
        let grouped = combine(&a, &combine(&b, &c));

        assert_eq!(abc.segments(), cba.segments());
        assert_eq!(abc.segments(), grouped.segments());
        assert_eq!(abc.total_amount(), 600);
        assert_eq!(abc.total_burden(), 750);
        assert_eq!(abc.label(), "A & B & C");
        assert_eq!(
            abc.segments(),
            &segs(&[(5, 151), (5, 152), (5, 182), (15, 282)])[..]
        );
    }

    #[test]
    fn test_combine_all_empty_collection() {
        let none: Vec<MortgageSchedule> = Vec::new();
        assert!(combine_all(&none).is_empty());
    }
}
