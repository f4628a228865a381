//! Interpolation helpers

use nalgebra::Vector3;

/// `num` evenly spaced values over `[start, stop]`, both ends included.
///
/// The first and last entries are exactly `start` and `stop`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            values[num - 1] = stop;
            values
        }
    }
}

/// Linear blend `(1 - s)·a + s·b`
///
/// Written as a weighted sum rather than `a + s·(b - a)` so that `s = 0`
/// and `s = 1` return the endpoints exactly.
pub fn blend(a: &Vector3<f64>, b: &Vector3<f64>, s: f64) -> Vector3<f64> {
    a * (1.0 - s) + b * s
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(1.0, 2.0, 12);
        assert_eq!(v.len(), 12);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[11], 2.0);
        for w in v.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn test_linspace_degenerate() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 5.0, 1), vec![3.0]);
        assert_eq!(linspace(3.0, 5.0, 2), vec![3.0, 5.0]);
    }

    #[test]
    fn test_blend() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(2.5, 0.0, 5.0);
        assert_eq!(blend(&a, &b, 0.0), a);
        assert_eq!(blend(&a, &b, 1.0), b);
        assert_relative_eq!(blend(&a, &b, 0.5), Vector3::new(1.25, 0.0, 2.5), epsilon = 1e-12);
    }
}
