use crate::core::Complex;

/// mirror of `w` about the local z axis
pub fn reflect(w: glam::Vec3A) -> glam::Vec3A {
    glam::Vec3A::new(-w.x, -w.y, w.z)
}

/// mirror of `w` about the unit vector `n`
pub fn reflect_n(w: glam::Vec3A, n: glam::Vec3A) -> glam::Vec3A {
    2.0 * w.dot(n) * n - w
}

/// Snell's law, `None` on total internal reflection
pub fn cos_transmitted(eta: f32, cos_i: f32) -> Option<f32> {
    let cos_t_sqr = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if cos_t_sqr < 0.0 {
        None
    } else {
        Some(cos_t_sqr.sqrt())
    }
}

/// unpolarized reflectance for the relative index `eta` = eta_i / eta_t
pub fn fresnel_dielectric(eta: f32, cos_i: f32) -> f32 {
    let cos_i = cos_i.abs();
    if let Some(cos_t) = cos_transmitted(eta, cos_i) {
        let r_parallel = (cos_i - eta * cos_t) / (cos_i + eta * cos_t);
        let r_perpendicular = (cos_t - eta * cos_i) / (cos_t + eta * cos_i);
        0.5 * (r_parallel * r_parallel + r_perpendicular * r_perpendicular)
    } else {
        1.0
    }
}

/// unpolarized reflectance for a complex relative index, the transmitted cosine
/// is the principal square root
pub fn fresnel_complex(eta: Complex, cos_i: f32) -> f32 {
    let cos_i = Complex::new(cos_i.abs(), 0.0);
    let one = Complex::new(1.0, 0.0);
    let cos_t = (one - eta * eta * (one - cos_i * cos_i)).sqrt();

    let eta_cos_t = eta * cos_t;
    let eta_cos_i = eta * cos_i;
    let r_parallel = (cos_i - eta_cos_t) / (cos_i + eta_cos_t);
    let r_perpendicular = (cos_t - eta_cos_i) / (cos_t + eta_cos_i);
    let reflectance = 0.5 * (r_parallel.norm_sqr() + r_perpendicular.norm_sqr());
    if reflectance.is_finite() {
        reflectance.min(1.0)
    } else {
        1.0
    }
}

pub fn schlick_fresnel(eta_i: f32, eta_t: f32, cos_i: f32) -> f32 {
    let r0 = pow2((eta_i - eta_t) / (eta_i + eta_t));
    r0 + (1.0 - r0) * pow5(1.0 - cos_i.abs())
}

/// anisotropic Trowbridge-Reitz distribution, `m` in the upper hemisphere
pub fn ggx_ndf_aniso(m: glam::Vec3A, roughness_x: f32, roughness_y: f32) -> f32 {
    if m.z <= 0.0 {
        return 0.0;
    }
    let t = pow2(m.x / roughness_x) + pow2(m.y / roughness_y) + m.z * m.z;
    std::f32::consts::FRAC_1_PI / (roughness_x * roughness_y * t * t)
}

/// Smith lambda, alpha folded with the azimuth of `w`
pub fn smith_lambda_aniso(w: glam::Vec3A, roughness_x: f32, roughness_y: f32) -> f32 {
    let cos_sqr = w.z * w.z;
    if cos_sqr == 0.0 {
        return f32::INFINITY;
    }
    // alpha^2 tan^2 = (ax^2 x^2 + ay^2 y^2) / z^2
    let alpha_tan_sqr = (pow2(roughness_x * w.x) + pow2(roughness_y * w.y)) / cos_sqr;
    0.5 * ((1.0 + alpha_tan_sqr).sqrt() - 1.0)
}

pub fn smith_g1_aniso(w: glam::Vec3A, roughness_x: f32, roughness_y: f32) -> f32 {
    1.0 / (1.0 + smith_lambda_aniso(w, roughness_x, roughness_y))
}

/// height correlated masking-shadowing
pub fn smith_g2_aniso(
    wo: glam::Vec3A,
    wi: glam::Vec3A,
    roughness_x: f32,
    roughness_y: f32,
) -> f32 {
    1.0 / (1.0
        + smith_lambda_aniso(wo, roughness_x, roughness_y)
        + smith_lambda_aniso(wi, roughness_x, roughness_y))
}

/// visible normal sampling, `wo` must be in the upper hemisphere
pub fn ggx_smith_vndf_sample(
    wo: glam::Vec3A,
    roughness_x: f32,
    roughness_y: f32,
    rand: (f32, f32),
) -> glam::Vec3A {
    // stretch to the hemisphere configuration
    let vh = glam::Vec3A::new(roughness_x * wo.x, roughness_y * wo.y, wo.z).normalize();

    let len_sqr = vh.x * vh.x + vh.y * vh.y;
    let t1 = if len_sqr > 0.0 {
        glam::Vec3A::new(-vh.y, vh.x, 0.0) / len_sqr.sqrt()
    } else {
        glam::Vec3A::X
    };
    let t2 = vh.cross(t1);

    // warp a uniform disk sample onto the visible part of the projected hemisphere
    let r = rand.0.sqrt();
    let phi = 2.0 * std::f32::consts::PI * rand.1;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let p1 = r * cos_phi;
    let p2 = r * sin_phi;
    let s = 0.5 * (1.0 + vh.z);
    let p2 = (1.0 - s) * (1.0 - p1 * p1).max(0.0).sqrt() + s * p2;
    let p3 = (1.0 - p1 * p1 - p2 * p2).max(0.0).sqrt();
    let nh = p1 * t1 + p2 * t2 + p3 * vh;

    glam::Vec3A::new(
        roughness_x * nh.x,
        roughness_y * nh.y,
        nh.z.max(1e-6),
    )
    .normalize()
}

pub fn pow2(x: f32) -> f32 {
    x * x
}

fn pow5(x: f32) -> f32 {
    let x2 = x * x;
    x2 * x2 * x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;

    #[test]
    fn fresnel_at_normal_incidence() {
        let r = fresnel_dielectric(1.0 / 1.5, 1.0);
        assert!((r - 0.04).abs() < 1e-6);
        let r = fresnel_dielectric(1.5, 1.0);
        assert!((r - 0.04).abs() < 1e-6);
    }

    #[test]
    fn fresnel_total_internal_reflection() {
        // critical angle of 1.5 -> 1 is about 41.8 degrees
        let cos_i = 60.0_f32.to_radians().cos();
        assert!(cos_transmitted(1.5, cos_i).is_none());
        assert_eq!(fresnel_dielectric(1.5, cos_i), 1.0);
        assert!(fresnel_dielectric(1.0 / 1.5, cos_i) < 1.0);
    }

    #[test]
    fn fresnel_grazing_goes_to_one() {
        let r = fresnel_dielectric(1.0 / 1.5, 1e-4);
        assert!(r > 0.99);
    }

    #[test]
    fn complex_fresnel_matches_real_case() {
        for cos_i in [1.0, 0.8, 0.5, 0.2] {
            let real = fresnel_dielectric(1.0 / 1.5, cos_i);
            let complex = fresnel_complex(Complex::new(1.0 / 1.5, 0.0), cos_i);
            assert!((real - complex).abs() < 1e-5);
        }
        let cos_i = 60.0_f32.to_radians().cos();
        assert!((fresnel_complex(Complex::new(1.5, 0.0), cos_i) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn complex_fresnel_of_metal() {
        let eta = Complex::new(1.0, 0.0) / Complex::new(0.2, 3.0);
        for cos_i in [1.0, 0.7, 0.3, 0.05] {
            let r = fresnel_complex(eta, cos_i);
            assert!(r > 0.8 && r <= 1.0);
        }
        let normal = fresnel_complex(eta, 1.0);
        // ((n - 1)^2 + k^2) / ((n + 1)^2 + k^2)
        let expected = (0.64 + 9.0) / (1.44 + 9.0);
        assert!((normal - expected).abs() < 1e-4);
    }

    #[test]
    fn complex_sqrt_recovers_value() {
        for z in [
            Complex::new(0.2, 3.0),
            Complex::new(-1.5, 0.7),
            Complex::new(4.0, -2.0),
            Complex::new(-0.3, -0.9),
        ] {
            let root = (z * z).sqrt();
            assert!((root - z).norm() < 1e-4 || (root + z).norm() < 1e-4);
        }
    }

    #[test]
    fn ndf_is_normalized() {
        // integral of D(m) cos over the hemisphere is one
        let mut rng = Rng::with_seed(17);
        for (ax, ay) in [(0.3, 0.3), (0.2, 0.6)] {
            let count = 200_000;
            let mut sum = 0.0;
            for _ in 0..count {
                let m = rng.uniform_on_hemisphere();
                sum += ggx_ndf_aniso(m, ax, ay) * m.z;
            }
            let estimate = sum * 2.0 * std::f32::consts::PI / count as f32;
            assert!((estimate - 1.0).abs() < 0.05, "estimate {}", estimate);
        }
    }

    #[test]
    fn vndf_samples_face_the_viewer() {
        let mut rng = Rng::with_seed(3);
        let wo = glam::Vec3A::new(0.6, 0.0, 0.8);
        for _ in 0..1000 {
            let m = ggx_smith_vndf_sample(wo, 0.5, 0.2, rng.uniform_2d());
            assert!((m.length() - 1.0).abs() < 1e-4);
            assert!(m.z > 0.0);
            assert!(wo.dot(m) >= -1e-4);
        }
    }

    #[test]
    fn masking_limits() {
        let up = glam::Vec3A::Z;
        assert!(smith_lambda_aniso(up, 0.5, 0.5).abs() < 1e-6);
        assert!((smith_g1_aniso(up, 0.5, 0.5) - 1.0).abs() < 1e-6);
        let grazing = glam::Vec3A::new(0.999, 0.0, 0.0447).normalize();
        assert!(smith_g1_aniso(grazing, 0.5, 0.5) < 0.2);
        let g2 = smith_g2_aniso(up, grazing, 0.5, 0.5);
        assert!(g2 <= smith_g1_aniso(grazing, 0.5, 0.5));
    }
}
