//! # k 点 / 能带范围校验
//!
//! 把用户请求的范围与 OUTCAR 给出的上界比较，生成 `ExecutionRequest`。
//! 未指定的维度取完整范围。先检查区间顺序，再检查上下界。
//!
//! ## 依赖关系
//! - 被 `runner/session.rs`, `commands/run.rs` 使用
//! - 使用 `models/`

use crate::error::{IrssgError, Result};
use crate::models::{CalculationMetadata, ExecutionRequest, RangeSpec};

/// 校验范围，返回第一个违例
pub fn validate_range(spec: &RangeSpec, meta: &CalculationMetadata) -> Result<ExecutionRequest> {
    let mut violations = validate_all(spec, meta);
    if violations.is_empty() {
        let (k, bands) = resolve(spec, meta);
        Ok(ExecutionRequest::new_unchecked(
            k,
            bands,
            meta.num_k,
            meta.num_bands,
        ))
    } else {
        Err(violations.remove(0))
    }
}

/// 收集全部违例（区间顺序在前，上下界在后）
pub fn validate_all(spec: &RangeSpec, meta: &CalculationMetadata) -> Vec<IrssgError> {
    let mut errors = Vec::new();

    if meta.num_k == 0 {
        errors.push(IrssgError::InvalidArgument(
            "no k-points available: NKPTS not found in OUTCAR".to_string(),
        ));
    }
    if meta.num_bands == 0 {
        errors.push(IrssgError::InvalidArgument(
            "no bands available: NBANDS not found in OUTCAR".to_string(),
        ));
    }
    if !errors.is_empty() {
        return errors;
    }

    let ((k_start, k_end), (band_start, band_end)) = resolve(spec, meta);

    if k_start > k_end {
        errors.push(IrssgError::InvalidRange(format!(
            "k_start ({}) is greater than k_end ({})",
            k_start, k_end
        )));
    }
    if band_start > band_end {
        errors.push(IrssgError::InvalidRange(format!(
            "band_start ({}) is greater than band_end ({})",
            band_start, band_end
        )));
    }

    check_bound(&mut errors, "k_start", k_start, meta.num_k);
    check_bound(&mut errors, "k_end", k_end, meta.num_k);
    check_bound(&mut errors, "band_start", band_start, meta.num_bands);
    check_bound(&mut errors, "band_end", band_end, meta.num_bands);

    errors
}

fn resolve(spec: &RangeSpec, meta: &CalculationMetadata) -> ((usize, usize), (usize, usize)) {
    (
        spec.k.unwrap_or((1, meta.num_k)),
        spec.bands.unwrap_or((1, meta.num_bands)),
    )
}

fn check_bound(errors: &mut Vec<IrssgError>, bound: &'static str, value: usize, max: usize) {
    if value < 1 || value > max {
        errors.push(IrssgError::OutOfRange {
            bound,
            value,
            min: 1,
            max,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(num_k: usize, num_bands: usize) -> CalculationMetadata {
        CalculationMetadata {
            num_k,
            num_bands,
            ..CalculationMetadata::default()
        }
    }

    #[test]
    fn test_defaults_to_full_range() {
        let req = validate_range(&RangeSpec::full(), &meta(10, 20)).unwrap();
        assert_eq!(req.k_range(), (1, 10));
        assert_eq!(req.band_range(), (1, 20));
        assert!(req.is_full_k() && req.is_full_bands());
    }

    #[test]
    fn test_sub_range_accepted() {
        let spec = RangeSpec::new(Some((2, 5)), None);
        let req = validate_range(&spec, &meta(10, 20)).unwrap();
        assert_eq!(req.k_range(), (2, 5));
        assert_eq!(req.band_range(), (1, 20));
    }

    #[test]
    fn test_rejects_k_start_zero() {
        let spec = RangeSpec::new(Some((0, 5)), None);
        match validate_range(&spec, &meta(10, 20)) {
            Err(IrssgError::OutOfRange { bound, value, min, max }) => {
                assert_eq!(bound, "k_start");
                assert_eq!(value, 0);
                assert_eq!((min, max), (1, 10));
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_k_end_beyond_num_k() {
        let spec = RangeSpec::new(Some((1, 11)), None);
        match validate_range(&spec, &meta(10, 20)) {
            Err(IrssgError::OutOfRange { bound, value, .. }) => {
                assert_eq!(bound, "k_end");
                assert_eq!(value, 11);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_reversed_k_range() {
        let spec = RangeSpec::new(Some((6, 3)), None);
        let err = validate_range(&spec, &meta(10, 20)).unwrap_err();
        assert!(matches!(err, IrssgError::InvalidRange(ref msg) if msg.contains("k_start")));
        assert_eq!(
            err.to_string(),
            "Invalid range: k_start (6) is greater than k_end (3)"
        );
    }

    #[test]
    fn test_band_bounds() {
        let spec = RangeSpec::new(None, Some((5, 21)));
        match validate_range(&spec, &meta(10, 20)) {
            Err(IrssgError::OutOfRange { bound, max, .. }) => {
                assert_eq!(bound, "band_end");
                assert_eq!(max, 20);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_ordering_reported_before_bounds() {
        let spec = RangeSpec::new(Some((12, 11)), None);
        let errors = validate_all(&spec, &meta(10, 20));
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], IrssgError::InvalidRange(_)));
        assert!(matches!(errors[1], IrssgError::OutOfRange { bound: "k_start", .. }));
        assert!(matches!(errors[2], IrssgError::OutOfRange { bound: "k_end", .. }));
    }

    #[test]
    fn test_empty_metadata_rejects_everything() {
        let errors = validate_all(&RangeSpec::full(), &meta(0, 0));
        assert_eq!(errors.len(), 2);
        assert!(validate_range(&RangeSpec::full(), &meta(0, 8)).is_err());
    }
}
