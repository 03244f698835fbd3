#[cfg(test)]
mod tests {
    use crate::OdeTopology::expr_parser::{parse_expression, prepare_text};
    use crate::OdeTopology::symbolic::{SymExpr, fmt_num, py_float};
    use RustedSciThe::symbolic::parse_expr::parse_expression_func;
    use RustedSciThe::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;

    #[test]
    fn test_canonical_display() {
        let cases = [
            ("km - m*rm", "km - m*rm"),
            ("kp*m - P*rp", "-P*rp + kp*m"),
            ("1 + C**2", "C**2 + 1"),
            ("A*B*ka/(1+C**2)", "A*B*ka/(C**2 + 1)"),
            ("x/(y*z)", "x/(y*z)"),
            ("2/x", "2/x"),
            ("x*x*x", "x**3"),
            ("0.5*k*A", "0.5*A*k"),
            ("a - a", "0"),
        ];
        for (input, expected) in cases {
            let e = parse_expression(input).unwrap();
            assert_eq!(e.to_string(), expected, "input {}", input);
        }
    }

    #[test]
    fn test_display_reparses_to_same_expression() {
        let inputs = [
            "-ka*A*B/(1+C**2) + kf1/(1+B**2)",
            "k*exp(-E/T)*A",
            "V*S/(Km + S)",
            "k*A**0.5*B**1.5 - 3*k2",
            "a**b*c",
        ];
        for input in inputs {
            let e = parse_expression(input).unwrap();
            let again = parse_expression(&e.to_string()).unwrap();
            assert_eq!(e, again, "input {}", input);
        }
    }

    #[test]
    fn test_expansion() {
        let e = parse_expression("(a + b)**2").unwrap();
        assert_eq!(e.to_string(), "a**2 + 2*a*b + b**2");
        let e = parse_expression("k*(A - B)*(A + B)").unwrap();
        assert_eq!(e.to_string(), "A**2*k - B**2*k");
        let e = parse_expression("(x + 1)*(x - 1) + 1").unwrap();
        assert_eq!(e.to_string(), "x**2");
    }

    #[test]
    fn test_groups_keep_their_coefficients() {
        let a = parse_expression("1/(2 + 2*C)").unwrap();
        assert_eq!(a.to_string(), "1/(2*C + 2)");
        assert_eq!(a.terms().len(), 1);
        assert_eq!(a.terms()[0].1, 1.0);
        assert_ne!(a, parse_expression("0.5/(C + 1)").unwrap());

        let b = parse_expression("k*A/(3 + 3*B)").unwrap();
        assert_eq!(b.to_string(), "A*k/(3*B + 3)");
        assert_eq!(b.terms()[0].1, 1.0);

        let two = parse_expression("k/(2 + 2*C) + k/(1 + C)").unwrap();
        assert_eq!(two.terms().len(), 2);
    }

    #[test]
    fn test_terms_in_degree_order() {
        let e = parse_expression("-k*A - k*A**2").unwrap();
        let monomials: Vec<String> = e
            .terms()
            .into_iter()
            .map(|(m, _)| SymExpr::from_term(m.clone(), 1.0).to_string())
            .collect();
        assert_eq!(monomials, vec!["A**2*k", "A*k"]);
        assert_eq!(e.to_string(), "-A**2*k - A*k");
        assert_eq!(parse_expression("x + x**3 + 2").unwrap().to_string(), "x**3 + x + 2");
    }

    #[test]
    fn test_division_cancels_monomials() {
        let q = parse_expression("-3*A*B*k").unwrap().div(&parse_expression("k*B*A").unwrap());
        assert_eq!(q.as_constant(), Some(-3.0));
        let q = parse_expression("A*k").unwrap().div(&parse_expression("A*B*k").unwrap());
        assert_eq!(q.as_constant(), None);
        assert_eq!(q.to_string(), "1/B");
    }

    #[test]
    fn test_free_symbols() {
        let e = parse_expression("ka*A*B/(1+C**2) + exp(-E/T)").unwrap();
        let symbols: Vec<String> = e.free_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["A", "B", "C", "E", "T", "ka"]);
    }

    #[test]
    fn test_approx_eq_tolerates_rounding_noise() {
        let a = parse_expression("0.1*k + 0.2*k").unwrap();
        let b = parse_expression("0.3*k").unwrap();
        assert!(a.approx_eq(&b, 1e-9));
        assert!(!a.approx_eq(&parse_expression("0.3*k + x").unwrap(), 1e-9));
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(fmt_num(2.0), "2");
        assert_eq!(fmt_num(-0.25), "-0.25");
        assert_eq!(py_float(1.0), "1.0");
        assert_eq!(py_float(2.5), "2.5");
        assert_eq!(py_float(0.333), "0.333");
    }

    #[test]
    fn test_rusted_export_evaluates_like_parsed_expr() {
        let input = "ka*A*B/(1+C**2) - 2*kc*C + kf/(2 + 2*C)";
        let args = vec!["ka", "A", "B", "C", "kc", "kf"];
        let point = vec![0.02, 1.5, 2.0, 0.5, 0.3, 0.1];
        let raw = parse_expression_func(0, &prepare_text(input).unwrap()).unwrap();
        let expected = raw.lambdify_owned(args.clone())(point.clone());
        assert_relative_eq!(
            expected,
            0.02 * 1.5 * 2.0 / 1.25 - 2.0 * 0.3 * 0.5 + 0.1 / 3.0,
            epsilon = 1e-12
        );

        let fun = parse_expression(input).unwrap().to_rusted().lambdify_owned(args);
        assert_relative_eq!(fun(point), expected, epsilon = 1e-10);
        assert!(matches!(SymExpr::zero().to_rusted(), Expr::Const(c) if c == 0.0));
    }
}
