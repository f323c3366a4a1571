use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurveParseError;

// ---------------------------------------------------------------------------
// Keyframed response curve
// ---------------------------------------------------------------------------

/// One key of a response curve.
///
/// `tangents` holds `(in, out)` slopes. A segment is cubic Hermite when its
/// left key has tangents and its right key has tangents; otherwise it is linear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangents: Option<(f64, f64)>,
}

impl Keyframe {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value, tangents: None }
    }

    pub fn with_tangents(time: f64, value: f64, in_tangent: f64, out_tangent: f64) -> Self {
        Self { time, value, tangents: Some((in_tangent, out_tangent)) }
    }

    fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.value.is_finite()
            && self.tangents.map_or(true, |(a, b)| a.is_finite() && b.is_finite())
    }
}

/// Scalar mapping from saturation fraction to a scale factor.
///
/// Keys are kept sorted by `time`. Lookups before the first key or after the
/// last key hold the end value. An empty curve has no value at all; callers
/// pick the fallback (see [`ResponseCurves`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    /// Build a curve from keys in any order. Non-finite keys are dropped.
    pub fn new(keys: impl IntoIterator<Item = Keyframe>) -> Self {
        let mut keys: Vec<Keyframe> = keys.into_iter().filter(Keyframe::is_finite).collect();
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Piecewise-linear curve through `(time, value)` points.
    pub fn linear(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&(t, v)| Keyframe::new(t, v)))
    }

    pub fn constant(value: f64) -> Self {
        Self::new([Keyframe::new(0.0, value)])
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Evaluate at `x`. `None` only for an empty curve.
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        let x = if x.is_nan() { 0.0 } else { x };

        if x <= first.time {
            return Some(first.value);
        }
        if x >= last.time {
            return Some(last.value);
        }

        // first key strictly after x; always in 1..len here
        let hi = self.keys.partition_point(|k| k.time <= x);
        let k0 = &self.keys[hi - 1];
        let k1 = &self.keys[hi];

        let span = k1.time - k0.time;
        if span <= 0.0 {
            return Some(k1.value);
        }
        let u = (x - k0.time) / span;

        let value = match (k0.tangents, k1.tangents) {
            (Some((_, m0)), Some((m1, _))) => {
                let u2 = u * u;
                let u3 = u2 * u;
                let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
                let h10 = u3 - 2.0 * u2 + u;
                let h01 = -2.0 * u3 + 3.0 * u2;
                let h11 = u3 - u2;
                h00 * k0.value + h10 * span * m0 + h01 * k1.value + h11 * span * m1
            }
            _ => k0.value + u * (k1.value - k0.value),
        };
        Some(value)
    }

    /// Smallest and largest key values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.keys.iter().map(|k| k.value);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

impl From<Vec<Keyframe>> for Curve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Curve::new(keys)
    }
}

impl From<Curve> for Vec<Keyframe> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}

/// Text form: one key per line, `time value` or `time value in out`,
/// optionally prefixed with `key =`. Blank lines and `//` comments are skipped.
impl FromStr for Curve {
    type Err = CurveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut keys = Vec::new();
        for (idx, raw) in s.lines().enumerate() {
            let line_no = idx + 1;
            let mut line = raw.trim();
            if let Some(pos) = line.find("//") {
                line = line[..pos].trim();
            }
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix("key") {
                line = rest.trim_start().trim_start_matches('=').trim();
            }

            let numbers = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f64>().map_err(|_| CurveParseError::NotANumber {
                        line: line_no,
                        token: tok.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            if numbers.iter().any(|v| !v.is_finite()) {
                return Err(CurveParseError::NonFinite { line: line_no });
            }

            let key = match numbers.as_slice() {
                [t, v] => Keyframe::new(*t, *v),
                [t, v, tin, tout] => Keyframe::with_tangents(*t, *v, *tin, *tout),
                other => {
                    return Err(CurveParseError::FieldCount { line: line_no, found: other.len() })
                }
            };
            keys.push(key);
        }
        Ok(Curve::new(keys))
    }
}

// ---------------------------------------------------------------------------
// Torque + bleed curve pair
// ---------------------------------------------------------------------------

/// The two response curves a wheel evaluates every tick.
///
/// Lookups clamp the saturation fraction to `[0, 1]` and never return a
/// negative or non-finite scale. An empty torque curve means full torque; an
/// empty bleed curve means no bleed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseCurves {
    #[serde(default)]
    pub torque: Curve,
    #[serde(default)]
    pub bleed: Curve,
}

impl ResponseCurves {
    pub fn new(torque: Curve, bleed: Curve) -> Self {
        Self { torque, bleed }
    }

    /// Fraction of nominal torque still deliverable at this saturation.
    pub fn torque_scale(&self, saturation: f64) -> f64 {
        lookup(&self.torque, saturation, 1.0)
    }

    /// Share of the axis torque spent bleeding stored momentum at this saturation.
    pub fn bleed_scale(&self, saturation: f64) -> f64 {
        lookup(&self.bleed, saturation, 0.0)
    }
}

fn lookup(curve: &Curve, saturation: f64, fallback: f64) -> f64 {
    let x = if saturation.is_nan() { 0.0 } else { saturation.clamp(0.0, 1.0) };
    match curve.evaluate(x) {
        Some(v) if v.is_finite() => v.max(0.0),
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_interpolates_between_keys() {
        let c = Curve::linear(&[(0.0, 1.0), (1.0, 0.0)]);
        assert_relative_eq!(c.evaluate(0.25).unwrap(), 0.75, epsilon = 1e-12);
        assert_relative_eq!(c.evaluate(0.5).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn holds_end_values_outside_keys() {
        let c = Curve::linear(&[(0.2, 0.8), (0.6, 0.1)]);
        assert_eq!(c.evaluate(-3.0), Some(0.8));
        assert_eq!(c.evaluate(0.0), Some(0.8));
        assert_eq!(c.evaluate(0.9), Some(0.1));
    }

    #[test]
    fn keys_are_sorted_on_construction() {
        let c = Curve::linear(&[(1.0, 0.0), (0.0, 1.0), (0.5, 0.9)]);
        let times: Vec<f64> = c.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn hermite_segment_passes_through_keys() {
        let c = Curve::new([
            Keyframe::with_tangents(0.0, 1.0, 0.0, 0.0),
            Keyframe::with_tangents(1.0, 0.0, 0.0, 0.0),
        ]);
        assert_relative_eq!(c.evaluate(0.0).unwrap(), 1.0);
        assert_relative_eq!(c.evaluate(1.0).unwrap(), 0.0);
        // flat tangents give the smoothstep midpoint
        assert_relative_eq!(c.evaluate(0.5).unwrap(), 0.5, epsilon = 1e-12);
        // and ease-in near the first key
        assert!(c.evaluate(0.1).unwrap() > 0.9);
    }

    #[test]
    fn empty_curves_fall_back() {
        let curves = ResponseCurves::default();
        assert_eq!(curves.torque_scale(0.7), 1.0);
        assert_eq!(curves.bleed_scale(0.7), 0.0);
    }

    #[test]
    fn lookups_clamp_domain_and_range() {
        let curves = ResponseCurves::new(
            Curve::linear(&[(0.0, 1.0), (1.0, -0.5)]),
            Curve::linear(&[(0.0, 0.0), (2.0, 2.0)]),
        );
        // fraction above 1 looks up at 1, negative outputs floor at 0
        assert_eq!(curves.torque_scale(4.0), 0.0);
        assert_relative_eq!(curves.bleed_scale(4.0), 1.0);
        assert_eq!(curves.bleed_scale(f64::NAN), 0.0);
    }

    #[test]
    fn value_range_spans_keys() {
        let c = Curve::linear(&[(0.0, 0.02), (0.5, 0.2), (1.0, 0.1)]);
        assert_eq!(c.value_range(), Some((0.02, 0.2)));
        assert_eq!(Curve::default().value_range(), None);
    }

    #[test]
    fn parses_key_lines() {
        let text = "key = 0 1\n  key = 0.5 0.9 -0.2 -0.2 // knee\n\n1 0.05\n";
        let c: Curve = text.parse().unwrap();
        assert_eq!(c.keys().len(), 3);
        assert_eq!(c.keys()[1].tangents, Some((-0.2, -0.2)));
        assert_eq!(c.evaluate(1.0), Some(0.05));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            "0 1 2".parse::<Curve>(),
            Err(CurveParseError::FieldCount { line: 1, found: 3 })
        );
        assert!(matches!(
            "0 1\nfoo 2".parse::<Curve>(),
            Err(CurveParseError::NotANumber { line: 2, .. })
        ));
        assert_eq!("0 inf".parse::<Curve>(), Err(CurveParseError::NonFinite { line: 1 }));
    }

    #[test]
    fn deserializes_from_key_list() {
        let c: Curve =
            serde_json::from_str(r#"[{"time":1.0,"value":0.0},{"time":0.0,"value":1.0}]"#).unwrap();
        assert_eq!(c.keys()[0].time, 0.0);
        assert_eq!(c.evaluate(0.5), Some(0.5));
    }
}
