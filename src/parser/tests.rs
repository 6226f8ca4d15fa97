//! Parser tests.

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::Parser;

    fn parse_program(source: &str) -> Program {
        let mut parser = Parser::from_source(source);
        let program = parser.parse();
        assert!(
            parser.errors().is_empty(),
            "parser errors for {:?}: {:?}",
            source,
            parser.errors()
        );
        program
    }

    fn parse_expr(source: &str) -> Expr {
        let program = parse_program(source);
        assert_eq!(program.statements.len(), 1, "program: {}", program);
        match program.statements.into_iter().next().unwrap().kind {
            StmtKind::Expression(expr) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn let_statements() {
        let tests = [
            ("let x = 5;", "x", "5"),
            ("let y = true;", "y", "true"),
            ("let foobar = y;", "foobar", "y"),
        ];

        for (source, expected_name, expected_value) in tests {
            let program = parse_program(source);
            assert_eq!(program.statements.len(), 1);
            match &program.statements[0].kind {
                StmtKind::Let { name, value } => {
                    assert_eq!(name, expected_name);
                    assert_eq!(value.to_string(), expected_value);
                }
                other => panic!("expected let statement, got {:?}", other),
            }
        }
    }

    #[test]
    fn let_names_function_literals() {
        let program = parse_program("let myFunction = fn() { };");
        match &program.statements[0].kind {
            StmtKind::Let { value, .. } => match &value.kind {
                ExprKind::FunctionLiteral { name, .. } => assert_eq!(name, "myFunction"),
                other => panic!("expected function literal, got {:?}", other),
            },
            other => panic!("expected let statement, got {:?}", other),
        }
    }

    #[test]
    fn bare_function_literals_stay_anonymous() {
        let expr = parse_expr("fn(x) { x };");
        match expr.kind {
            ExprKind::FunctionLiteral { name, .. } => assert_eq!(name, ""),
            other => panic!("expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn return_statements() {
        let program = parse_program("return 5; return foobar;");
        assert_eq!(program.statements.len(), 2);
        for stmt in &program.statements {
            assert!(matches!(stmt.kind, StmtKind::Return(_)));
        }
    }

    #[test]
    fn identifier_expression() {
        let expr = parse_expr("foobar;");
        assert_eq!(expr.kind, ExprKind::Identifier("foobar".to_string()));
    }

    #[test]
    fn integer_literal() {
        let expr = parse_expr("5;");
        assert_eq!(expr.kind, ExprKind::IntegerLiteral(5));
    }

    #[test]
    fn string_literal() {
        let expr = parse_expr("\"hello world\";");
        assert_eq!(expr.kind, ExprKind::StringLiteral("hello world".to_string()));
    }

    #[test]
    fn boolean_literals() {
        assert_eq!(parse_expr("true;").kind, ExprKind::BooleanLiteral(true));
        assert_eq!(parse_expr("false;").kind, ExprKind::BooleanLiteral(false));
    }

    #[test]
    fn prefix_expressions() {
        let tests = [
            ("!5;", UnaryOp::Not, "5"),
            ("-15;", UnaryOp::Neg, "15"),
            ("!true;", UnaryOp::Not, "true"),
        ];

        for (source, expected_op, expected_right) in tests {
            let expr = parse_expr(source);
            match expr.kind {
                ExprKind::Prefix { operator, right } => {
                    assert_eq!(operator, expected_op);
                    assert_eq!(right.to_string(), expected_right);
                }
                other => panic!("expected prefix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn infix_expressions() {
        let tests = [
            ("5 + 5;", BinaryOp::Add),
            ("5 - 5;", BinaryOp::Sub),
            ("5 * 5;", BinaryOp::Mul),
            ("5 / 5;", BinaryOp::Div),
            ("5 > 5;", BinaryOp::Gt),
            ("5 < 5;", BinaryOp::Lt),
            ("5 == 5;", BinaryOp::Eq),
            ("5 != 5;", BinaryOp::NotEq),
        ];

        for (source, expected_op) in tests {
            let expr = parse_expr(source);
            match expr.kind {
                ExprKind::Infix { operator, .. } => assert_eq!(operator, expected_op),
                other => panic!("expected infix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn operator_precedence() {
        let tests = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];

        for (source, expected) in tests {
            let program = parse_program(source);
            assert_eq!(program.to_string(), expected, "source: {}", source);
        }
    }

    #[test]
    fn if_expression() {
        let expr = parse_expr("if (x < y) { x }");
        match expr.kind {
            ExprKind::If {
                condition,
                consequence,
                alternative,
            } => {
                assert_eq!(condition.to_string(), "(x < y)");
                assert_eq!(consequence.statements.len(), 1);
                assert!(alternative.is_none());
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn if_else_expression() {
        let expr = parse_expr("if (x < y) { x } else { y }");
        match expr.kind {
            ExprKind::If { alternative, .. } => {
                let alt = alternative.expect("expected alternative block");
                assert_eq!(alt.statements.len(), 1);
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn function_literal_parameters() {
        let tests = [
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ];

        for (source, expected) in tests {
            let expr = parse_expr(source);
            match expr.kind {
                ExprKind::FunctionLiteral { parameters, .. } => {
                    assert_eq!(parameters, expected);
                }
                other => panic!("expected function literal, got {:?}", other),
            }
        }
    }

    #[test]
    fn call_expression() {
        let expr = parse_expr("add(1, 2 * 3, 4 + 5);");
        match expr.kind {
            ExprKind::Call { callee, arguments } => {
                assert_eq!(callee.to_string(), "add");
                assert_eq!(arguments.len(), 3);
                assert_eq!(arguments[1].to_string(), "(2 * 3)");
            }
            other => panic!("expected call expression, got {:?}", other),
        }
    }

    #[test]
    fn array_literal() {
        let expr = parse_expr("[1, 2 * 2, 3 + 3]");
        match expr.kind {
            ExprKind::ArrayLiteral(elements) => {
                assert_eq!(elements.len(), 3);
                assert_eq!(elements[1].to_string(), "(2 * 2)");
            }
            other => panic!("expected array literal, got {:?}", other),
        }
    }

    #[test]
    fn index_expression() {
        let expr = parse_expr("myArray[1 + 1]");
        match expr.kind {
            ExprKind::Index { left, index } => {
                assert_eq!(left.to_string(), "myArray");
                assert_eq!(index.to_string(), "(1 + 1)");
            }
            other => panic!("expected index expression, got {:?}", other),
        }
    }

    #[test]
    fn hash_literal_string_keys() {
        let expr = parse_expr("{\"one\": 1, \"two\": 2, \"three\": 3}");
        match expr.kind {
            ExprKind::HashLiteral(pairs) => {
                assert_eq!(pairs.len(), 3);
                assert_eq!(pairs[0].0.to_string(), "one");
                assert_eq!(pairs[0].1.to_string(), "1");
            }
            other => panic!("expected hash literal, got {:?}", other),
        }
    }

    #[test]
    fn empty_hash_literal() {
        let expr = parse_expr("{}");
        match expr.kind {
            ExprKind::HashLiteral(pairs) => assert!(pairs.is_empty()),
            other => panic!("expected hash literal, got {:?}", other),
        }
    }

    #[test]
    fn hash_literal_with_expressions() {
        let expr = parse_expr("{\"one\": 0 + 1, \"two\": 10 - 8}");
        match expr.kind {
            ExprKind::HashLiteral(pairs) => {
                assert_eq!(pairs[0].1.to_string(), "(0 + 1)");
                assert_eq!(pairs[1].1.to_string(), "(10 - 8)");
            }
            other => panic!("expected hash literal, got {:?}", other),
        }
    }

    #[test]
    fn errors_accumulate_and_parsing_continues() {
        let mut parser = Parser::from_source("let x 5; let y = 8;");
        let program = parser.parse();

        assert!(!parser.errors().is_empty());
        // The second statement still parses.
        assert!(program
            .statements
            .iter()
            .any(|s| matches!(&s.kind, StmtKind::Let { name, .. } if name == "y")));
    }

    #[test]
    fn no_prefix_parse_error() {
        let mut parser = Parser::from_source("let a = 1 + 2; @");
        parser.parse();
        let rendered: Vec<String> = parser.errors().iter().map(|e| e.to_string()).collect();
        assert!(
            rendered
                .iter()
                .any(|m| m.contains("no prefix parse function for ILLEGAL found")),
            "errors: {:?}",
            rendered
        );
    }

    #[test]
    fn integer_overflow_is_reported() {
        let mut parser = Parser::from_source("92233720368547758080;");
        parser.parse();
        assert!(parser
            .errors()
            .iter()
            .any(|e| e.to_string().contains("could not parse")));
    }

    #[test]
    fn multiple_trailing_semicolons() {
        let program = parse_program("let a = 1;;; a;;");
        assert_eq!(program.statements.len(), 2);
    }
}
