//! # 晶格数据模型
//!
//! OUTCAR 的 `direct lattice vectors` 块与 WAVECAR 第二条记录都给出
//! 3×3 的实空间晶格矩阵，这里提供统一表示。
//!
//! ## 依赖关系
//! - 被 `parsers/outcar.rs`, `parsers/wavecar.rs` 使用
//! - 被 `commands/info.rs` 用于打印晶格参数

use serde::{Deserialize, Serialize};

/// 晶格参数表示
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 从按行展开的 9 个分量创建
    pub fn from_row_major(values: &[f64; 9]) -> Self {
        Lattice {
            matrix: [
                [values[0], values[1], values[2]],
                [values[3], values[4], values[5]],
                [values[6], values[7], values[8]],
            ],
        }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;

        let a = norm(a_vec);
        let b = norm(b_vec);
        let c = norm(c_vec);

        let alpha = (dot(b_vec, c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(a_vec, c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(a_vec, b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（行列式，带符号）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 两个晶格逐分量比较
    pub fn approx_eq(&self, other: &Lattice, tol: f64) -> bool {
        self.matrix
            .iter()
            .flatten()
            .zip(other.matrix.iter().flatten())
            .all(|(x, y)| (x - y).abs() <= tol)
    }
}

fn dot(u: [f64; 3], v: [f64; 3]) -> f64 {
    u.iter().zip(v.iter()).map(|(x, y)| x * y).sum()
}

fn norm(u: [f64; 3]) -> f64 {
    dot(u, u).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_parameters_cubic() {
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 5.0).abs() < 1e-6);
        assert!((b - 5.0).abs() < 1e-6);
        assert!((c - 5.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_volume_fcc_primitive() {
        // fcc 原胞: 体积 = a^3 / 4
        let lattice = Lattice::from_vectors([[0.0, 2.0, 2.0], [2.0, 0.0, 2.0], [2.0, 2.0, 0.0]]);
        assert!((lattice.volume().abs() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_lattice_from_row_major() {
        let lattice =
            Lattice::from_row_major(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(lattice.matrix[1], [4.0, 5.0, 6.0]);
        assert_eq!(lattice.matrix[2][0], 7.0);
    }

    #[test]
    fn test_lattice_approx_eq() {
        let a = Lattice::from_vectors([[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]]);
        let mut b = a;
        b.matrix[2][2] += 1e-7;
        assert!(a.approx_eq(&b, 1e-6));
        b.matrix[0][1] = 0.1;
        assert!(!a.approx_eq(&b, 1e-6));
    }
}
