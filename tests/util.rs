/// Check whether two floats differ by at most `$tolerance` times the smaller magnitude.
#[macro_export]
macro_rules! assert_floats_near_equal {
    ($val1:expr, $val2:expr, $tolerance:expr, $msg:expr) => {{
        let a: f64 = $val1;
        let b: f64 = $val2;
        let smaller = if a.abs() < b.abs() { a.abs() } else { b.abs() };
        let relative_diff = (a - b).abs() / smaller;
        assert!(
            relative_diff <= $tolerance,
            "{}: {} vs {} (relative difference {})",
            $msg,
            a,
            b,
            relative_diff
        );
    }};
    ($val1:expr, $val2:expr, $msg:expr) => {
        $crate::assert_floats_near_equal!($val1, $val2, 0.00005, $msg)
    };
}
