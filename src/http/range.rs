//! HTTP Range request parsing module
//!
//! Single byte-range support (RFC 7233): `bytes=a-b`, `bytes=a-` and `bytes=-n`.
//! Multi-range requests and other units are answered with the full body.

/// How a Range header applies to a body of known length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable Range header, send everything
    Full,
    /// Send the inclusive byte span `start..=end`
    Partial { start: usize, end: usize },
    /// The range lies outside the body, answer 416
    Unsatisfiable,
}

/// Evaluate a Range header against a body of `total` bytes
pub fn evaluate_range(range_header: Option<&str>, total: usize) -> RangeOutcome {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    if spec.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };

    match (first.trim(), last.trim()) {
        ("", suffix) => suffix_range(suffix, total),
        (start, end) => bounded_range(start, end, total),
    }
}

fn suffix_range(suffix: &str, total: usize) -> RangeOutcome {
    match suffix.parse::<usize>() {
        Err(_) => RangeOutcome::Full,
        Ok(0) => RangeOutcome::Unsatisfiable,
        Ok(_) if total == 0 => RangeOutcome::Unsatisfiable,
        Ok(n) => RangeOutcome::Partial {
            start: total.saturating_sub(n),
            end: total - 1,
        },
    }
}

fn bounded_range(start: &str, end: &str, total: usize) -> RangeOutcome {
    let Ok(start) = start.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= total {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end.is_empty() {
        total - 1
    } else {
        match end.parse::<usize>() {
            Ok(e) => e.min(total - 1),
            Err(_) => return RangeOutcome::Full,
        }
    };

    if start > end {
        RangeOutcome::Unsatisfiable
    } else {
        RangeOutcome::Partial { start, end }
    }
}
