//! Formatting helpers shared by the code writers.

/// Format a number the way it appears in generated code: integral values
/// print without a fraction part, everything else uses the shortest float
/// form.
pub fn fmt_num(v : f64) -> String {
    if v == f64::INFINITY {
        return "Infinity".to_string();
    }
    else if v == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    }
    else {
        format!("{}", v)
    }
}

/// Format a bound value for a member override line. Infinite bounds render
/// through the OPTMODEL `constant` function.
pub fn fmt_bound(v : f64) -> String {
    if v == f64::INFINITY {
        "constant('BIG')".to_string()
    }
    else if v == f64::NEG_INFINITY {
        "-constant('BIG')".to_string()
    }
    else {
        fmt_num(v)
    }
}

/// Quote a string literal for generated code.
pub fn quote(s : &str) -> String {
    format!("'{}'", s)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(fmt_num(6.0), "6");
        assert_eq!(fmt_num(-5.0), "-5");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_bound(f64::NEG_INFINITY), "-constant('BIG')");
        assert_eq!(fmt_bound(f64::INFINITY), "constant('BIG')");
    }
}
