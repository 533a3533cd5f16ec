use voxbox_geom::{AXES, Aabb, Axis, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_add_sub_neg() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    let c = a + b;
    assert!(vec3_approx_eq(c, Vec3::new(-3.0, 7.0, -3.0), 1e-6));
    assert!(vec3_approx_eq(c - a, b, 1e-6));
    assert!(vec3_approx_eq(-a, Vec3::new(-1.0, -2.0, -3.0), 1e-6));
}

#[test]
fn vec3_dot_length_normalized() {
    let v = Vec3::new(3.0, 4.0, 0.0);
    assert!(approx_eq(v.dot(v), 25.0, 1e-6));
    assert!(approx_eq(v.length(), 5.0, 1e-6));
    assert!(vec3_approx_eq(v.normalized(), Vec3::new(0.6, 0.8, 0.0), 1e-6));

    // Zero stays zero instead of turning into NaN
    assert!(vec3_approx_eq(Vec3::ZERO.normalized(), Vec3::ZERO, 1e-6));
    assert!(Vec3::ZERO.is_zero());
    assert!(!Vec3::UP.is_zero());
}

#[test]
fn vec3_axis_access() {
    let mut v = Vec3::new(1.0, 2.0, 3.0);
    assert_eq!(v.get(Axis::X), 1.0);
    assert_eq!(v.get(Axis::Y), 2.0);
    assert_eq!(v.get(Axis::Z), 3.0);
    v.set(Axis::Y, -7.5);
    assert_eq!(v, Vec3::new(1.0, -7.5, 3.0));
    let idx: Vec<usize> = AXES.iter().map(|a| a.index()).collect();
    assert_eq!(idx, vec![0, 1, 2]);
}

#[test]
fn aabb_center_size_translate() {
    let b = Aabb::from_center_size(Vec3::new(3.0, 7.0, 3.0), Vec3::new(6.0, 14.0, 6.0));
    assert!(vec3_approx_eq(b.min, Vec3::new(0.0, 0.0, 0.0), 1e-6));
    assert!(vec3_approx_eq(b.max, Vec3::new(6.0, 14.0, 6.0), 1e-6));
    assert!(vec3_approx_eq(b.size(), Vec3::new(6.0, 14.0, 6.0), 1e-6));
    let t = b.translated(Vec3::new(-1.0, 0.5, 2.0));
    assert!(vec3_approx_eq(t.center(), Vec3::new(2.0, 7.5, 5.0), 1e-6));
    assert!(vec3_approx_eq(t.size(), b.size(), 1e-6));
}

#[test]
fn aabb_voxel_cell() {
    let v = Aabb::voxel(-2, 0, 5);
    assert_eq!(v.min, Vec3::new(-2.0, 0.0, 5.0));
    assert_eq!(v.max, Vec3::new(-1.0, 1.0, 6.0));
}
