use crate::error::{PdfSplitterError, Result};
use crate::services::ranges::{is_digit_string, RangeList};
use crate::types::PageSpan;
use tracing::debug;

pub struct RangeValidator;

impl RangeValidator {
    /// Normalizes the list into numeric spans in display order.
    ///
    /// Incomplete ranges are dropped without error. Fails with
    /// `NoValidRanges` when nothing remains, or with `InvalidRangeOrder`
    /// on the first range whose start exceeds its end. Overlaps and page
    /// bounds are left to the split service.
    pub fn validate(ranges: &RangeList) -> Result<Vec<PageSpan>> {
        let complete: Vec<_> = ranges.iter().filter(|r| r.is_complete()).collect();

        let dropped = ranges.len() - complete.len();
        if dropped > 0 {
            debug!("Ignoring {} incomplete range(s)", dropped);
        }

        if complete.is_empty() {
            return Err(PdfSplitterError::NoValidRanges);
        }

        let mut spans = Vec::with_capacity(complete.len());
        for range in complete {
            let start = parse_page_number(&range.start)?;
            let end = parse_page_number(&range.end)?;

            if start > end {
                return Err(PdfSplitterError::InvalidRangeOrder { start, end });
            }

            spans.push(PageSpan { start, end });
        }

        Ok(spans)
    }
}

/// Parses a page number from a digit string. Leading zeros are accepted.
pub fn parse_page_number(value: &str) -> Result<u64> {
    if value.is_empty() || !is_digit_string(value) {
        return Err(PdfSplitterError::InvalidPageNumber {
            value: value.to_string(),
        });
    }

    // digits only, so the sole failure left is overflow
    value
        .parse::<u64>()
        .map_err(|_| PdfSplitterError::PageNumberTooLarge {
            value: value.to_string(),
        })
}
