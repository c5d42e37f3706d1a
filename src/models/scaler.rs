use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::error::{DetectorError, DetectorResult};

/// Per-column standardisation: `(x - mean) / std`
#[derive(Clone, Debug)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit on population statistics. Constant columns get a scale of 1.
    pub fn fit(x: &Array2<f64>) -> DetectorResult<Self> {
        let mean = x.mean_axis(Axis(0)).ok_or(DetectorError::EmptyTrainingSet)?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 0.0 { s } else { 1.0 });
        Ok(Self { mean, scale })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, x: &Array2<f64>) -> DetectorResult<Array2<f64>> {
        self.check_width(x.ncols())?;
        Ok((x - &self.mean) / &self.scale)
    }

    pub fn transform_row(&self, row: ArrayView1<f64>) -> DetectorResult<Array1<f64>> {
        self.check_width(row.len())?;
        Ok((&row - &self.mean) / &self.scale)
    }

    fn check_width(&self, actual: usize) -> DetectorResult<()> {
        if actual != self.n_features() {
            return Err(DetectorError::DimensionMismatch {
                expected: self.n_features(),
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_fit_transform_standardises_columns() {
        let x = arr2(&[[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]]);
        let scaler = StandardScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();

        let col0 = scaled.column(0);
        assert_relative_eq!(col0.mean().unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(scaled.std_axis(Axis(0), 0.0)[0], 1.0, epsilon = 1e-12);

        // Constant column: centred, not divided by zero
        assert!(scaled.column(1).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_transform_row_matches_matrix() {
        let x = arr2(&[[0.0, -2.0], [4.0, 2.0]]);
        let scaler = StandardScaler::fit(&x).unwrap();
        let row = scaler.transform_row(arr1(&[4.0, 2.0]).view()).unwrap();
        assert_relative_eq!(row[0], 1.0);
        assert_relative_eq!(row[1], 1.0);
    }

    #[test]
    fn test_empty_fit_rejected() {
        let x = Array2::<f64>::zeros((0, 3));
        assert_eq!(
            StandardScaler::fit(&x).unwrap_err(),
            DetectorError::EmptyTrainingSet
        );
    }

    #[test]
    fn test_width_mismatch() {
        let scaler = StandardScaler::fit(&arr2(&[[1.0, 2.0]])).unwrap();
        let err = scaler.transform_row(arr1(&[1.0]).view()).unwrap_err();
        assert_eq!(
            err,
            DetectorError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }
}
