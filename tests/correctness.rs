use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use strided_ndarray::{
    add, argmax, argsort, array, assert_array_eq, assert_array_near, copy, dot, expand_dims, eye,
    flatten, inv, linspace, matmul, matrix, max, mean, min, ones, reshape, solve, sort, squeeze,
    sub, sum, take_along_axis, transpose, var, zeros, ErrorKind, NdArray, NdArrayError,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_array(rng: &mut StdRng, dims: &[usize]) -> NdArray<f64> {
    NdArray::from_fn(dims, |_| rng.gen_range(-100.0..100.0))
}

fn random_dims(rng: &mut StdRng) -> Vec<usize> {
    let rank = rng.gen_range(1..=4);
    (0..rank).map(|_| rng.gen_range(1..=4)).collect()
}

// ============================================================================
// Shape transforms
// ============================================================================

#[test]
fn test_reshape_round_trip_preserves_order() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let dims = random_dims(&mut rng);
        let a = random_array(&mut rng, &dims);
        let n = a.len();
        let target = if n % 2 == 0 { vec![2, n / 2] } else { vec![n, 1] };
        let r = reshape(&a, &target).unwrap();
        assert_eq!(flatten(&r).data(), flatten(&a).data());
        assert_eq!(reshape(&r, &dims).unwrap(), a);
    }
}

#[test]
fn test_double_transpose_is_identity() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let dims = random_dims(&mut rng);
        let a = random_array(&mut rng, &dims);
        let tt = transpose(&transpose(&a, None).unwrap(), None).unwrap();
        assert_eq!(tt, a);
    }
}

#[test]
fn test_transpose_rank3_axes() {
    let a = array(&[[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]], [[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]])
        .unwrap();
    let t = transpose(&a, Some(&[1, 2, 0])).unwrap();
    assert_array_eq!(
        t,
        array(&[[[1.0, 7.0], [2.0, 8.0]], [[3.0, 9.0], [4.0, 10.0]], [[5.0, 11.0], [6.0, 12.0]]])
            .unwrap()
    );
    let t = transpose(&a, Some(&[0, 2, 1])).unwrap();
    assert_array_eq!(
        t,
        array(&[[[1.0, 3.0, 5.0], [2.0, 4.0, 6.0]], [[7.0, 9.0, 11.0], [8.0, 10.0, 12.0]]]).unwrap()
    );
}

#[test]
fn test_squeeze_and_expand_dims() {
    let a = array(&[[[[0.0], [1.0], [2.0]], [[-3.0], [4.0], [5.0]]]]).unwrap();
    let expected = array(&[[0.0, 1.0, 2.0], [-3.0, 4.0, 5.0]]).unwrap();
    assert_array_eq!(squeeze(&a, &[0, 3]).unwrap(), expected);

    let v = array(&[0.0, 1.0, 2.0]).unwrap();
    assert_array_eq!(
        expand_dims(&v, &[0, 1, 3]).unwrap(),
        array(&[[[[0.0], [1.0], [2.0]]]]).unwrap()
    );

    let err = squeeze(&a, &[1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Dimension);
}

#[test]
fn test_reshape_size_error_is_dimension_kind() {
    let a = ones::<f64>(&[2, 3]);
    let err = reshape(&a, &[5]).unwrap_err();
    assert_eq!(err, NdArrayError::ReshapeSize { size: 6, shape: vec![5] });
    assert_eq!(err.kind(), ErrorKind::Dimension);
}

// ============================================================================
// Construction and elementwise
// ============================================================================

#[test]
fn test_copy_is_deep() {
    let a = array(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let mut b = copy(&a);
    b[[1, 1]] = 0.0;
    assert_eq!(a[[1, 1]], 4.0);
}

#[test]
fn test_matrix_rejects_rank3() {
    let err = matrix(&[[[1.0]]]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Dimension);
}

#[test]
fn test_linspace_inclusive() {
    assert_array_eq!(
        linspace(1.0, 10.0, 10),
        array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]).unwrap()
    );
}

#[test]
fn test_scalar_broadcast_matches_full_array() {
    let mut rng = StdRng::seed_from_u64(3);
    let a = random_array(&mut rng, &[3, 4, 2]);
    let twos = NdArray::from_fn(a.dims(), |_| 2.0);
    assert_array_eq!(add(&a, 2.0).unwrap(), add(&a, &twos).unwrap());
    assert_array_eq!(sub(2.0, &a).unwrap(), sub(&twos, &a).unwrap());
}

#[test]
fn test_elementwise_shape_mismatch_kind() {
    let a = zeros::<f64>(&[2, 3]);
    let b = zeros::<f64>(&[3, 2]);
    assert_eq!(add(&a, &b).unwrap_err().kind(), ErrorKind::ShapeMismatch);
}

// ============================================================================
// Reductions
// ============================================================================

#[test]
fn test_argmax_axis0() {
    let a = array(&[[[0.0, 1.0, 2.0], [-3.0, 4.0, 5.0]], [[10.0, 11.0, 12.0], [-13.0, 14.0, 15.0]]])
        .unwrap();
    assert_array_eq!(
        argmax(&a, Some(0)).unwrap(),
        array(&[[1.0, 1.0, 1.0], [0.0, 1.0, 1.0]]).unwrap()
    );
}

#[test]
fn test_reductions_agree_with_flat_iteration() {
    let mut rng = StdRng::seed_from_u64(19);
    let a = random_array(&mut rng, &[3, 5, 4]);
    for axis in 0..3 {
        let s = sum(&a, Some(axis)).unwrap();
        let mx = max(&a, Some(axis)).unwrap();
        let mn = min(&a, Some(axis)).unwrap();
        let m = mean(&a, Some(axis)).unwrap();
        let v = var(&a, Some(axis)).unwrap();
        let sd = strided_ndarray::std(&a, Some(axis)).unwrap();
        let extent = a.dims()[axis];
        for (flat, out_idx) in (0..s.len()).map(|f| (f, unravel(f, s.dims()))) {
            let lane: Vec<f64> = (0..extent)
                .map(|j| {
                    let mut idx = out_idx.clone();
                    idx.insert(axis, j);
                    a[&idx[..]]
                })
                .collect();
            let total: f64 = lane.iter().sum();
            let mu = total / extent as f64;
            let variance = lane.iter().map(|x| (x - mu) * (x - mu)).sum::<f64>() / extent as f64;
            assert_relative_eq!(s.data()[flat], total, epsilon = 1e-9);
            assert_relative_eq!(m.data()[flat], mu, epsilon = 1e-9);
            assert_relative_eq!(v.data()[flat], variance, epsilon = 1e-6);
            assert_relative_eq!(sd.data()[flat], variance.sqrt(), epsilon = 1e-6);
            assert_eq!(mx.data()[flat], lane.iter().cloned().fold(f64::MIN, f64::max));
            assert_eq!(mn.data()[flat], lane.iter().cloned().fold(f64::MAX, f64::min));
        }
    }
}

fn unravel(mut flat: usize, dims: &[usize]) -> Vec<usize> {
    let mut index = vec![0; dims.len()];
    for d in (0..dims.len()).rev() {
        index[d] = flat % dims[d];
        flat /= dims[d];
    }
    index
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_argsort_gather_is_non_decreasing() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..10 {
        let dims = random_dims(&mut rng);
        let a = random_array(&mut rng, &dims);
        for axis in 0..dims.len() {
            let idx = argsort(&a, Some(axis)).unwrap();
            let g = take_along_axis(&a, &idx, Some(axis)).unwrap();
            let extent = dims[axis];
            for flat in 0..g.len() {
                let pos = unravel(flat, &dims);
                if pos[axis] + 1 < extent {
                    let mut next = pos.clone();
                    next[axis] += 1;
                    assert!(g[&pos[..]] <= g[&next[..]]);
                }
            }
        }
    }
}

#[test]
fn test_sort_matches_sorted_lanes() {
    let mut rng = StdRng::seed_from_u64(29);
    let a = random_array(&mut rng, &[4, 7, 3]);
    for axis in 0..3 {
        let mut s = a.clone();
        sort(&mut s, Some(axis)).unwrap();
        let idx = argsort(&a, Some(axis)).unwrap();
        assert_array_eq!(s, take_along_axis(&a, &idx, Some(axis)).unwrap());
    }
}

// ============================================================================
// Linear algebra
// ============================================================================

#[test]
fn test_matmul_scenario() {
    let a = array(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    let b = array(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
    assert_array_eq!(matmul(&a, &b).unwrap(), array(&[[22.0, 28.0], [49.0, 64.0]]).unwrap());
}

#[test]
fn test_matmul_eye_is_identity() {
    let mut rng = StdRng::seed_from_u64(31);
    let a = random_array(&mut rng, &[5, 3]);
    assert_array_eq!(dot(&a, &eye(3, None)).unwrap(), a);
}

#[test]
fn test_inv_random_well_conditioned() {
    let mut rng = StdRng::seed_from_u64(37);
    for n in 1..6 {
        // diagonally dominant
        let a = NdArray::from_fn(&[n, n], |idx| {
            let v: f64 = rng.gen_range(-1.0..1.0);
            if idx[0] == idx[1] {
                v + 2.0 * n as f64
            } else {
                v
            }
        });
        let a_inv = inv(&a).unwrap().unwrap();
        assert_array_near!(matmul(&a_inv, &a).unwrap(), eye::<f64>(n, None), 1e-6);
    }
}

#[test]
fn test_inv_scenarios() {
    let a = array(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let b = inv(&a).unwrap().unwrap();
    assert_array_near!(matmul(&a, &b).unwrap(), array(&[[1.0, 0.0], [0.0, 1.0]]).unwrap(), 1e-6);

    let singular = array(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
    assert!(inv(&singular).unwrap().is_none());
}

fn polynomial_system(n: usize, c: [f64; 3]) -> (NdArray<f64>, NdArray<f64>) {
    let mut a = zeros::<f64>(&[n, 3]);
    let mut b = zeros::<f64>(&[n, 1]);
    for i in 0..n {
        let x = (i * 10) as f64;
        a[[i, 0]] = 1.0;
        a[[i, 1]] = x;
        a[[i, 2]] = x.powi(2);
        b[[i, 0]] = c[0] + c[1] * x + c[2] * x.powi(2);
    }
    (a, b)
}

#[test]
fn test_solve_polynomial_fit() {
    let c = [1.0, 0.01, 0.001];
    let expected = array(&[[c[0]], [c[1]], [c[2]]]).unwrap();

    let (a, b) = polynomial_system(3, c);
    assert_array_near!(solve(&a, &b).unwrap().unwrap(), expected, 1e-6);

    // least squares through the normal equations
    let (a, b) = polynomial_system(10, c);
    let at = a.t();
    let x = solve(&matmul(&at, &a).unwrap(), &matmul(&at, &b).unwrap())
        .unwrap()
        .unwrap();
    assert_array_near!(x, expected, 1e-6);
}
