//! Homogeneous camera transform built from rotation, translation, intrinsic
//! and axis-permutation matrices.

use strided_ndarray::{assert_array_near, eye, inv, matmul, matrix, NdArray};

struct CameraParams {
    x: f64,
    y: f64,
    z: f64,
    roll: f64,
    pitch: f64,
    yaw: f64,
    focal_u: f64,
    focal_v: f64,
    cu: f64,
    cv: f64,
}

struct CameraGeometry {
    h: NdArray<f64>,
    inv_h: NdArray<f64>,
    inv_h3x3: NdArray<f64>,
}

impl CameraGeometry {
    fn new(p: &CameraParams) -> Self {
        let (sr, cr) = p.roll.sin_cos();
        let rx = matrix(&[
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cr, -sr, 0.0],
            [0.0, sr, cr, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();

        let (sp, cp) = p.pitch.sin_cos();
        let ry = matrix(&[
            [cp, 0.0, sp, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sp, 0.0, cp, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();

        let (sy, cy) = p.yaw.sin_cos();
        let rz = matrix(&[
            [cy, -sy, 0.0, 0.0],
            [sy, cy, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();

        let t = matrix(&[
            [1.0, 0.0, 0.0, p.x],
            [0.0, 1.0, 0.0, p.y],
            [0.0, 0.0, 1.0, p.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();

        let k = matrix(&[
            [p.focal_u, 0.0, p.cu, 0.0],
            [0.0, p.focal_v, p.cv, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();

        // camera axes: x right, y down, z forward
        let perm = matrix(&[
            [0.0, -1.0, 0.0, 0.0],
            [0.0, 0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();

        let r = matmul(&rz, &matmul(&ry, &rx).unwrap()).unwrap();
        let rt = matmul(&r, &t).unwrap();
        let h = matmul(&k, &matmul(&perm, &rt).unwrap()).unwrap();
        let inv_h = inv(&h).unwrap().expect("homography is invertible");

        let h3x3 = matrix(&[
            [h[[0, 0]], h[[0, 1]], h[[0, 3]]],
            [h[[1, 0]], h[[1, 1]], h[[1, 3]]],
            [h[[2, 0]], h[[2, 1]], h[[2, 3]]],
        ])
        .unwrap();
        let inv_h3x3 = inv(&h3x3).unwrap().expect("ground homography is invertible");

        Self {
            h,
            inv_h,
            inv_h3x3,
        }
    }
}

fn params() -> CameraParams {
    CameraParams {
        x: 1.5,
        y: 0.1,
        z: -1.2,
        roll: (-1.0f64).to_radians(),
        pitch: 1.0f64.to_radians(),
        yaw: 2.0f64.to_radians(),
        focal_u: 600.0,
        focal_v: 600.0,
        cu: 320.0,
        cv: 240.0,
    }
}

#[test]
fn test_camera_homography() {
    let cam = CameraGeometry::new(&params());
    let expected_h = matrix(&[
        [2.98819848e+02, -6.10800337e+02, -5.44484517e+00, 3.93683552e+02],
        [2.50288711e+02, 2.02218926e+00, -5.95778039e+02, 1.09056893e+03],
        [9.99238615e-01, -3.51985823e-02, 1.68300382e-02, 1.47514202e+00],
        [0.0, 0.0, 0.0, 1.0],
    ])
    .unwrap();
    assert_array_near!(cam.h, expected_h, 1e-5);
}

#[test]
fn test_camera_ground_homography_inverse() {
    let cam = CameraGeometry::new(&params());
    let expected = matrix(&[
        [-9.57627238e-05, -2.05361143e-03, 1.54378698e+00],
        [-1.66788703e-03, -1.09763671e-04, 5.26271050e-01],
        [2.50705032e-05, 1.38846585e-03, -3.55279397e-01],
    ])
    .unwrap();
    assert_array_near!(cam.inv_h3x3, expected, 1e-5);
}

#[test]
fn test_camera_full_inverse() {
    let cam = CameraGeometry::new(&params());
    assert_array_near!(matmul(&cam.h, &cam.inv_h).unwrap(), eye::<f64>(4, None), 1e-9);
}
