// src/view/bands.rs — Threshold bands for percentage tiles.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Favorable,
    Caution,
    Unfavorable,
}

/// Service level in percent: >= 80 favorable, >= 70 caution.
pub fn service_level_band(pct: f64) -> Band {
    higher_is_better(pct, 80.0, 70.0)
}

/// Answered share in percent: >= 90 favorable, >= 80 caution.
pub fn answered_band(pct: f64) -> Band {
    higher_is_better(pct, 90.0, 80.0)
}

/// Abandonment in percent: <= 5 favorable, <= 9.9 caution.
pub fn abandonment_band(pct: f64) -> Band {
    let pct = sanitize(pct);
    if pct <= 5.0 {
        Band::Favorable
    } else if pct <= 9.9 {
        Band::Caution
    } else {
        Band::Unfavorable
    }
}

fn higher_is_better(pct: f64, favorable: f64, caution: f64) -> Band {
    let pct = sanitize(pct);
    if pct >= favorable {
        Band::Favorable
    } else if pct >= caution {
        Band::Caution
    } else {
        Band::Unfavorable
    }
}

fn sanitize(pct: f64) -> f64 {
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_level_bands() {
        assert_eq!(service_level_band(85.0), Band::Favorable);
        assert_eq!(service_level_band(75.0), Band::Caution);
        assert_eq!(service_level_band(50.0), Band::Unfavorable);
    }

    #[test]
    fn test_service_level_boundaries() {
        assert_eq!(service_level_band(80.0), Band::Favorable);
        assert_eq!(service_level_band(70.0), Band::Caution);
        assert_eq!(service_level_band(69.99), Band::Unfavorable);
    }

    #[test]
    fn test_answered_bands() {
        assert_eq!(answered_band(90.0), Band::Favorable);
        assert_eq!(answered_band(85.0), Band::Caution);
        assert_eq!(answered_band(10.0), Band::Unfavorable);
    }

    #[test]
    fn test_abandonment_bands() {
        assert_eq!(abandonment_band(0.0), Band::Favorable);
        assert_eq!(abandonment_band(5.0), Band::Favorable);
        assert_eq!(abandonment_band(9.9), Band::Caution);
        assert_eq!(abandonment_band(9.95), Band::Unfavorable);
    }

    #[test]
    fn test_nan_treated_as_zero() {
        assert_eq!(service_level_band(f64::NAN), Band::Unfavorable);
        assert_eq!(abandonment_band(f64::NAN), Band::Favorable);
    }
}
