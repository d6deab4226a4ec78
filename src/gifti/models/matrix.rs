/// Space name used when a transform's space is unknown
pub const XFORM_UNKNOWN: &str = "NIFTI_XFORM_UNKNOWN";

/// A 4x4 affine transform between two named coordinate spaces
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateTransform {
    /// Space the array coordinates are in
    pub data_space: String,
    /// Space the matrix maps them to
    pub transformed_space: String,
    /// Row-major 4x4 matrix
    pub matrix: [[f64; 4]; 4],
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self {
            data_space: String::new(),
            transformed_space: String::new(),
            matrix: IDENTITY,
        }
    }
}

const IDENTITY: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

impl CoordinateTransform {
    /// Identity transform between two spaces
    pub fn identity(data_space: impl Into<String>, transformed_space: impl Into<String>) -> Self {
        Self {
            data_space: data_space.into(),
            transformed_space: transformed_space.into(),
            matrix: IDENTITY,
        }
    }

    /// Build from 16 row-major values
    pub fn from_row_major(
        data_space: impl Into<String>,
        transformed_space: impl Into<String>,
        values: [f64; 16],
    ) -> Self {
        let mut matrix = [[0.0; 4]; 4];
        for (i, row) in matrix.iter_mut().enumerate() {
            row.copy_from_slice(&values[i * 4..i * 4 + 4]);
        }
        Self {
            data_space: data_space.into(),
            transformed_space: transformed_space.into(),
            matrix,
        }
    }

    /// The 16 matrix entries in row-major order
    pub fn to_row_major(&self) -> [f64; 16] {
        let mut values = [0.0; 16];
        for (i, row) in self.matrix.iter().enumerate() {
            values[i * 4..i * 4 + 4].copy_from_slice(row);
        }
        values
    }

    /// Whether the matrix is exactly the identity
    pub fn is_identity(&self) -> bool {
        self.matrix == IDENTITY
    }

    /// Apply the affine part of the transform to a point
    pub fn transform_point(&self, point: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        let mut out = [0.0; 3];
        for (i, o) in out.iter_mut().enumerate() {
            *o = m[i][0] * point[0] + m[i][1] * point[1] + m[i][2] * point[2] + m[i][3];
        }
        out
    }
}
