use eraline_protocol::{Segment, Year};

/// Merge lifespans into maximal active segments.
///
/// `spans` are `(birth, end)` pairs sorted ascending by birth. A span joins
/// the current segment when it starts no later than `join_threshold` years
/// after the segment's end. Only active segments are returned; gaps are
/// the complement and are produced by the mapper.
pub fn build_active_segments(spans: &[(Year, Year)], join_threshold: i32) -> Vec<Segment> {
    let Some(&(first_start, first_end)) = spans.first() else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut current = Segment::active(first_start, first_end);

    for &(start, end) in &spans[1..] {
        if i64::from(start) <= i64::from(current.end) + i64::from(join_threshold) {
            current.end = current.end.max(end);
            continue;
        }
        segments.push(current);
        current = Segment::active(start, end);
    }

    segments.push(current);
    segments
}
