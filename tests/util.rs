/// Check whether two floats differ by at most 1e-9, scaled up by the larger magnitude when
/// comparing values above 1.
#[macro_export]
macro_rules! assert_close {
    ($val1:expr, $val2:expr, $msg:expr) => {{
        let a: f64 = $val1;
        let b: f64 = $val2;
        let scale = a.abs().max(b.abs()).max(1.0);
        assert!(
            (a - b).abs() <= 1e-9 * scale,
            "{}: {} is not close to {}",
            $msg,
            a,
            b
        );
    }};
}
