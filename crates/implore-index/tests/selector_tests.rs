//! Selector integration tests
//!
//! Selections are parsed with implore-pick and resolved against small
//! arrays whose expected values can be written down by hand.

use implore_index::{
    evaluate, AxisMap, DimensionMap, MapError, Reduction, SelectError, Selector, SelectorOptions,
};
use implore_pick::{Group, SelectionPath, Tree};
use ndarray::{array, s, Array, Array1, ArrayD, Axis};
use proptest::prelude::*;
use rstest::rstest;

fn paths(selection: &str) -> Vec<SelectionPath> {
    Tree::from_selection(selection).unwrap().selections().collect()
}

fn assert_close(actual: &ArrayD<f64>, expected: &ArrayD<f64>) {
    assert_eq!(actual.shape(), expected.shape());
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() < 1e-10 * (1.0 + e.abs()), "{actual} != {expected}");
    }
}

fn xyz_pq() -> DimensionMap {
    DimensionMap::new()
        .axis(0, AxisMap::new().label("x", 0).label("y", 1).label("z", 2))
        .axis(1, AxisMap::new().label("p", 0..2).label("q", 2..5))
}

// === Resolution ===

#[test]
fn test_two_registered_axes() {
    let values = Array::range(0.0, 15.0, 1.0).into_shape_with_order((3, 5)).unwrap();
    let maps = xyz_pq();
    let selector = Selector::new(&maps, values.view()).unwrap();

    let xq = selector.get(&SelectionPath::from(["x", "q"])).unwrap();
    assert_eq!(xq.ndim(), 0);
    assert_eq!(xq.sum(), values.slice(s![0, 2..5]).sum());

    let x = selector.get(&SelectionPath::from(["x"])).unwrap();
    assert_eq!(x.sum(), values.row(0).sum());
}

#[test]
fn test_unknown_label() {
    let values = Array::<f64, _>::zeros((3, 5));
    let maps = xyz_pq();
    let selector = Selector::new(&maps, values.view()).unwrap();
    let error = selector.get(&paths("unknown_tag")[0]).unwrap_err();
    assert!(error.to_string().contains("unknown_tag"));
    assert_eq!(
        error.valid_keys().map(<[String]>::to_vec),
        Some(vec!["x", "y", "z", "p", "q"].into_iter().map(String::from).collect())
    );
}

#[rstest]
#[case(SelectionPath::from([Group::range("A", "B")]))]
#[case(SelectionPath::from([Group::pair("A", "B")]))]
#[case(SelectionPath::from(["A"]))]
fn test_unknown_members(#[case] path: SelectionPath) {
    let values = Array::<f64, _>::zeros(10);
    let maps = DimensionMap::new().axis(0, AxisMap::new().label("B", 1));
    let selector = Selector::new(&maps, values.view()).unwrap();
    assert!(matches!(
        selector.get(&path),
        Err(SelectError::UnknownLabel { .. })
    ));
}

#[test]
fn test_conflicting_keys() {
    let values = Array::<f64, _>::zeros(10);
    let maps = DimensionMap::new().axis(0, AxisMap::new().label("A", 1).label("B", 2));
    let selector = Selector::new(&maps, values.view()).unwrap();
    let error = selector.get(&SelectionPath::from(["A", "B"])).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Conflicting keys 'A' and 'B' act on the same index."
    );
    assert!(selector.get(&SelectionPath::from(["A"])).is_ok());
    assert!(selector.get(&SelectionPath::from(["B"])).is_ok());
}

#[rstest]
#[case(["A", "x"], array![[30.0, 34.0, 38.0, 42.0, 46.0], [270.0, 274.0, 278.0, 282.0, 286.0]])]
#[case(["A", "y"], array![[15.0, 17.0, 19.0, 21.0, 23.0], [135.0, 137.0, 139.0, 141.0, 143.0]])]
#[case(["B", "x"], array![[110.0, 114.0, 118.0, 122.0, 126.0], [350.0, 354.0, 358.0, 362.0, 366.0]])]
#[case(["B", "y"], array![[55.0, 57.0, 59.0, 61.0, 63.0], [175.0, 177.0, 179.0, 181.0, 183.0]])]
fn test_two_of_four_components(#[case] path: [&str; 2], #[case] expected: ndarray::Array2<f64>) {
    let values = Array::range(0.0, 120.0, 1.0).into_shape_with_order((2, 3, 4, 5)).unwrap();
    let maps = DimensionMap::new()
        .axis(1, AxisMap::new().label("A", 0).label("B", 1))
        .axis(2, AxisMap::new().label("x", ..).label("y", 1..3));
    let selector = Selector::new(&maps, values.view()).unwrap();
    assert_eq!(selector.get(&SelectionPath::from(path)).unwrap(), expected.into_dyn());
}

// === Ranges and pairs ===

#[rstest]
#[case("1", "3", 0..3)]
#[case("2", "6", 1..6)]
#[case("4", "5", 3..5)]
fn test_range(#[case] left: &str, #[case] right: &str, #[case] expected: std::ops::Range<usize>) {
    let values = Array::range(0.0, 10.0, 1.0).mapv(|value: f64| value * value);
    let maps = DimensionMap::new().axis(
        0,
        AxisMap::new()
            .label("1", 0)
            .label("2", 1)
            .label("3", 2)
            .label("4", 3)
            .label("5", 4..5)
            .label("6", ndarray::Slice::new(5, Some(6), 1)),
    );
    let selector = Selector::new(&maps, values.view()).unwrap();
    let result = selector.get(&SelectionPath::from([Group::range(left, right)])).unwrap();
    assert_eq!(result.sum(), values.slice(s![expected]).sum());
}

#[test]
fn test_range_across_dimensions() {
    let values = Array::<f64, _>::zeros((3, 4));
    let maps = DimensionMap::new()
        .axis(0, AxisMap::new().label("A", 1))
        .axis(1, AxisMap::new().label("x", 2));
    let selector = Selector::new(&maps, values.view()).unwrap();
    assert!(matches!(
        selector.get(&SelectionPath::from([Group::range("A", "x")])),
        Err(SelectError::RangeAcrossDimensions { .. })
    ));
}

#[rstest]
#[case("A", "B")]
#[case("B", "A")]
#[case("C", "B")]
fn test_range_requires_unit_steps(#[case] left: &str, #[case] right: &str) {
    let values = Array::<f64, _>::zeros(10);
    let maps = DimensionMap::new().axis(
        0,
        AxisMap::new()
            .label("A", ndarray::Slice::new(1, Some(5), -1))
            .label("B", 2)
            .label("C", vec![1, 4]),
    );
    let selector = Selector::new(&maps, values.view()).unwrap();
    let error = selector
        .get(&SelectionPath::from([Group::range(left, right)]))
        .unwrap_err();
    assert!(matches!(error, SelectError::NonContiguousRange { .. }));
    assert!(error.to_string().contains("not contiguous"));
}

#[rstest]
#[case(Group::pair("A", "B"), 1)]
#[case(Group::pair("B", "A"), 1)]
#[case(Group::pair("C", "A"), 2)]
#[case(Group::pair("B", "C"), 3)]
fn test_pair(#[case] pair: Group, #[case] position: usize) {
    let values = Array::range(0.0, 10.0, 1.0).mapv(|value: f64| value * value);
    let maps = DimensionMap::new().axis(
        0,
        AxisMap::new()
            .label("total", 0)
            .label("A~B", 1)
            .label("A~C", 2)
            .label("B~C", 3),
    );
    let selector = Selector::new(&maps, values.view()).unwrap();
    let result = selector.get(&SelectionPath::from([pair])).unwrap();
    assert_eq!(result.sum(), values[position]);
}

// === Arithmetic ===

fn mix_selector_values() -> ndarray::Array3<f64> {
    Array::range(0.0, 60.0, 1.0)
        .mapv(|value: f64| value * value)
        .into_shape_with_order((3, 4, 5))
        .unwrap()
}

#[rstest]
#[case("A + x", [669.0, 7029.0, 20589.0])]
#[case("y - B", [-244.0, -1524.0, -3604.0])]
#[case("A(y) - x(B)", [-72.0, -232.0, -392.0])]
#[case("A(y - x)", [13.0, 53.0, 93.0])]
#[case("A:B - x", [571.0, 5411.0, 15051.0])]
#[case("y - z~z", [-80.0, -240.0, -400.0])]
fn test_mix_indices(#[case] selection: &str, #[case] expected: [f64; 3]) {
    let values = mix_selector_values();
    let maps = DimensionMap::new()
        .axis(1, AxisMap::new().label("A", 1).label("B", 2))
        .axis(2, AxisMap::new().label("x", 1).label("y", 2).label("z~z", 3));
    let selector = Selector::new(&maps, values.view()).unwrap();
    let result = evaluate(&selector, &paths(selection)[0]).unwrap();
    assert_close(&result, &Array1::from(expected.to_vec()).into_dyn());
}

#[rstest]
#[case("A - B(x + y)", "A - x(B) - y(B)")]
#[case("-A + B", "B - A")]
#[case("-A(x - y)", "A(y) - A(x)")]
#[case("A(1:3) + A(4:5)", "A")]
#[case("A(x + y(2)) - B(z(1 + 2))", "A(x) + A(y(2)) - B(z(1:2))")]
#[case("A - B(1 - x(2 + 3) + y(4 - 5))", "A - B(1) + B(x(2:3)) - B(y(4)) + B(y(5))")]
fn test_equivalent_operations(#[case] first: &str, #[case] second: &str) {
    let values = Array::range(1.0, 121.0, 1.0)
        .mapv(f64::ln)
        .into_shape_with_order((2, 3, 4, 5))
        .unwrap();
    let maps = DimensionMap::new()
        .axis(3, AxisMap::new().label("1", 0).label("2", 1).label("3", 2).label("4", 3).label("5", 4))
        .axis(0, AxisMap::new().label("A", 0).label("B", 1))
        .axis(1, AxisMap::new().label("x", 0).label("y", 1).label("z", 2));
    let selector = Selector::new(&maps, values.view()).unwrap();
    let first = paths(first);
    let second = paths(second);
    assert_eq!(first.len(), second.len());
    for (first, second) in first.iter().zip(&second) {
        assert_close(
            &evaluate(&selector, first).unwrap(),
            &evaluate(&selector, second).unwrap(),
        );
    }
}

#[test]
fn test_operation_with_defaults() {
    let values = Array::range(0.0, 60.0, 1.0)
        .mapv(|value: f64| (value / 10.0).sin())
        .into_shape_with_order((5, 3, 4))
        .unwrap();
    let maps = DimensionMap::new()
        .axis(2, AxisMap::new().label("A", 2..4).with_default(0..2))
        .axis(0, AxisMap::new().label("x", 2).label("y", 1).with_default(3));
    let selector = Selector::new(&maps, values.view()).unwrap();

    let a = values.slice(s![3, .., 2..4]).sum_axis(Axis(1));
    let x = values.slice(s![2, .., 0..2]).sum_axis(Axis(1));
    let y = values.slice(s![1, .., 0..2]).sum_axis(Axis(1));
    let x_a = values.slice(s![2, .., 2..4]).sum_axis(Axis(1));

    assert_close(&evaluate(&selector, &paths("A + x")[0]).unwrap(), &(&a + &x).into_dyn());
    assert_close(&evaluate(&selector, &paths("x(A) - x")[0]).unwrap(), &(&x_a - &x).into_dyn());
    assert_close(
        &evaluate(&selector, &paths("y - x + A")[0]).unwrap(),
        &(&(&y - &x) + &a).into_dyn(),
    );
}

#[test]
fn test_operation_with_product() {
    let values = Array::range(1.0, 25.0, 1.0).into_shape_with_order((2, 3, 4)).unwrap();
    let maps = DimensionMap::new()
        .axis(1, AxisMap::new().label("A", 0..2).label("B", 2))
        .axis(2, AxisMap::new().label("x", 1..3).label("y", vec![0, 3]));
    let options = SelectorOptions::new().with_reduction(Reduction::Product);
    let selector = Selector::with_options(&maps, values.view(), options).unwrap();

    let data = &values;
    let product = |rows: &[usize], columns: &[usize]| -> Array1<f64> {
        (0..2)
            .map(|i| {
                rows.iter()
                    .flat_map(|&j| columns.iter().map(move |&k| data[[i, j, k]]))
                    .product()
            })
            .collect()
    };
    let a = product(&[0, 1], &[0, 1, 2, 3]);
    let x = product(&[0, 1, 2], &[1, 2]);
    let b_y = product(&[2], &[0, 3]);
    assert_close(&evaluate(&selector, &paths("A + x")[0]).unwrap(), &(&a + &x).into_dyn());
    assert_close(&evaluate(&selector, &paths("B(y) - A")[0]).unwrap(), &(&b_y - &a).into_dyn());
}

// === Construction ===

#[test]
fn test_construction_rejects_bad_maps() {
    let values = Array::<f64, _>::zeros((5, 4));
    let maps = DimensionMap::new()
        .axis(0, AxisMap::new().label("A", 1).label("B", 0))
        .axis(1, AxisMap::new().label("B", 2).label("A", 3));
    let error = Selector::new(&maps, values.view()).unwrap_err();
    assert_eq!(
        error.to_string(),
        "The maps may not have duplicate keys, but 'B', 'A' occur more than once."
    );

    let maps = DimensionMap::new().axis(0, AxisMap::new().label("s", ndarray::Slice { start: 0, end: None, step: 0 }));
    assert!(matches!(
        Selector::new(&maps, values.view()),
        Err(MapError::ZeroStep { .. })
    ));

    let maps = DimensionMap::new().axis(0, AxisMap::new().label("a", 0).with_default(9));
    assert!(matches!(
        Selector::new(&maps, values.view()),
        Err(MapError::InvalidIndex { axis: 0, length: 5, .. })
    ));
}

#[test]
fn test_selectors_share_array_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Selector<'static>>();

    let values = Array::range(0.0, 15.0, 1.0).into_shape_with_order((3, 5)).unwrap();
    let maps = xyz_pq();
    let sums: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["x", "y", "z"]
            .into_iter()
            .map(|label| {
                let (maps, values) = (&maps, &values);
                scope.spawn(move || {
                    let selector = Selector::new(maps, values.view()).unwrap();
                    selector.get(&SelectionPath::from([label])).unwrap().sum()
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });
    assert_eq!(sums, vec![10.0, 35.0, 60.0]);
}

// === Property tests ===

proptest! {
    #[test]
    fn test_unaddressed_axes_are_summed(
        rows in 1usize..5,
        columns in 1usize..5,
        depth in 1usize..4,
        seed in prop::collection::vec(-10.0f64..10.0, 64),
    ) {
        let values = Array::from_shape_fn((rows, columns, depth), |(i, j, k)| {
            seed[(i * 16 + j * 4 + k) % seed.len()]
        });
        let maps = DimensionMap::new()
            .axis(0, (0..rows).map(|i| (format!("r{i}"), i)).collect())
            .axis(1, (0..columns).map(|j| (format!("c{j}"), j)).collect());
        let selector = Selector::new(&maps, values.view()).unwrap();
        prop_assert_eq!(selector.result_shape(), vec![depth]);
        for i in 0..rows {
            let result = selector.get(&SelectionPath::from([format!("r{i}")])).unwrap();
            let expected = values.index_axis(Axis(0), i).sum_axis(Axis(0)).into_dyn();
            prop_assert_eq!(result.shape(), &[depth]);
            for (a, e) in result.iter().zip(expected.iter()) {
                prop_assert!((a - e).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_pair_lookup_is_symmetric(left in "[a-z]{1,3}", right in "[A-Z]{1,3}", reversed in any::<bool>()) {
        let stored = if reversed {
            Group::pair(right.clone(), left.clone())
        } else {
            Group::pair(left.clone(), right.clone())
        };
        let values = array![1.0, 2.0, 3.0];
        let maps = DimensionMap::new().axis(0, AxisMap::new().label("other", 0).label(stored.to_string(), 2));
        let selector = Selector::new(&maps, values.view()).unwrap();
        let forward = selector.get(&SelectionPath::from([Group::pair(left.clone(), right.clone())])).unwrap();
        let backward = selector.get(&SelectionPath::from([Group::pair(right, left)])).unwrap();
        prop_assert_eq!(forward.sum(), 3.0);
        prop_assert_eq!(backward.sum(), 3.0);
    }

    #[test]
    fn test_contiguous_range_matches_slice(length in 2usize..12, start in 0usize..6, span in 0usize..6) {
        let start = start.min(length - 1);
        let end = (start + span).min(length - 1);
        let values = Array::range(0.0, length as f64, 1.0);
        let maps = DimensionMap::new().axis(0, (0..length).map(|i| (format!("{i}"), i)).collect());
        let selector = Selector::new(&maps, values.view()).unwrap();
        let range = Group::range(start.to_string(), end.to_string());
        let result = selector.get(&SelectionPath::from([range])).unwrap();
        prop_assert_eq!(result.sum(), values.slice(s![start..=end]).sum());
    }
}
