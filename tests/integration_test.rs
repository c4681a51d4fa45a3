use rand::Rng;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use vtlengine::engine::{run_script_file, ScriptEngine, ScriptError};
use vtlengine::expression::{
    evaluate_expression, resolve_expression, Context, ExpressionError, SymbolTable,
};
use vtlengine::script::Parser;
use vtlengine::types::{DataType, Value};

fn eval(engine: &ScriptEngine, source: &str) -> Value {
    engine.evaluate(source).unwrap()
}

#[test]
fn test_boolean_operators_random() {
    let engine = ScriptEngine::new();
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let a: bool = rng.gen();
        let b: bool = rng.gen();
        engine.set("a", a);
        engine.set("b", b);

        assert_eq!(eval(&engine, "a and b"), Value::Boolean(a && b));
        assert_eq!(eval(&engine, "a or b"), Value::Boolean(a || b));
        assert_eq!(eval(&engine, "a xor b"), Value::Boolean(a ^ b));
        assert_eq!(eval(&engine, "not a"), Value::Boolean(!a));
    }
}

#[test]
fn test_boolean_type_errors() {
    let engine = ScriptEngine::new();
    let cases = [
        ("1 and 2", "invalid type Integer, expected 1 to be Boolean"),
        ("true or 2", "invalid type Integer, expected 2 to be Boolean"),
        ("not 888", "invalid type Integer, expected 888 to be Boolean"),
    ];
    for (source, message) in cases {
        let err = engine.eval(&format!("r := {}", source)).unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Semantic(ExpressionError::InvalidType { .. })
        ));
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_undefined_variable() {
    let engine = ScriptEngine::new();
    let err = engine.eval("r := undefinedVariable + 42").unwrap_err();
    assert_eq!(err.to_string(), "undefined variable undefinedVariable");
}

#[test]
fn test_variable_identity() {
    let engine = ScriptEngine::new();
    engine.set("i", 123);
    engine.set("n", 123.4);
    engine.eval("a := i; b := n").unwrap();

    assert_eq!(engine.get("a"), Some(Value::Integer(123)));
    assert_eq!(engine.data_type("a"), Some(DataType::Integer));
    assert_eq!(engine.get("b"), Some(Value::Number(123.4)));
    assert_eq!(engine.data_type("b"), Some(DataType::Number));
}

#[test]
fn test_between_random() {
    let engine = ScriptEngine::new();
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let x: i64 = rng.gen_range(-100..100);
        let from: i64 = rng.gen_range(-100..100);
        let to: f64 = rng.gen_range(-100.0..100.0);
        engine.set("x", x);
        engine.set("lo", from);
        engine.set("hi", to);

        let expected = (from as f64) <= (x as f64) && (x as f64) <= to;
        assert_eq!(eval(&engine, "between(x, lo, hi)"), Value::Boolean(expected));
    }

    let err = engine.eval("r := between(x, \"a\", 3)").unwrap_err();
    assert_eq!(err.to_string(), "conflicting types: [Integer, String]");
}

#[test]
fn test_string_functions() {
    let engine = ScriptEngine::new();
    engine
        .eval(
            r#"
            s := "  Hello World  ";
            t := trim(s);
            u := ucase(t);
            l := lower(t);
            n := len(t);
            sub := substr("hello", 1, 3);
            rep := replace(t, "o", "0");
            pos := instr(t, "o", _, 2);
            m := match_characters(t, "[A-Z][a-z]+ [A-Z][a-z]+")
            "#,
        )
        .unwrap();

    assert_eq!(engine.get("t"), Some(Value::from("Hello World")));
    assert_eq!(engine.get("u"), Some(Value::from("HELLO WORLD")));
    assert_eq!(engine.get("l"), Some(Value::from("hello world")));
    assert_eq!(engine.get("n"), Some(Value::Integer(11)));
    assert_eq!(engine.get("sub"), Some(Value::from("el")));
    assert_eq!(engine.get("rep"), Some(Value::from("Hell0 W0rld")));
    assert_eq!(engine.get("pos"), Some(Value::Integer(8)));
    assert_eq!(engine.get("m"), Some(Value::Boolean(true)));
}

#[test]
fn test_null_propagation() {
    let engine = ScriptEngine::new();
    engine.declare("missing", DataType::Integer);
    engine
        .eval("a := missing + 1; b := isnull(missing); c := if missing > 0 then 1 else 2")
        .unwrap();

    assert_eq!(engine.get("a"), Some(Value::Null));
    assert_eq!(engine.get("b"), Some(Value::Boolean(true)));
    assert_eq!(engine.get("c"), Some(Value::Integer(2)));
}

#[test]
fn test_tree_reuse_across_threads() {
    let expr = Parser::new("x * 2 + 1")
        .unwrap()
        .parse_standalone_expression()
        .unwrap();
    let symbols = SymbolTable::new().with("x", DataType::Integer);
    let tree = Arc::new(resolve_expression(&expr, &symbols).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                let context = Context::new().with("x", i as i64);
                (0..100)
                    .map(|_| tree.resolve(&context).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let results = handle.join().unwrap();
        let expected = Value::Integer(i as i64 * 2 + 1);
        assert!(results.iter().all(|value| *value == expected));
    }
}

#[test]
fn test_repeated_evaluation_leaves_contexts_untouched() {
    let expr = Parser::new("if n > 2 then upper(s) || \"!\" else s")
        .unwrap()
        .parse_standalone_expression()
        .unwrap();
    let symbols = SymbolTable::new()
        .with("n", DataType::Integer)
        .with("s", DataType::String);
    let tree = resolve_expression(&expr, &symbols).unwrap();

    let first = Context::new().with("n", 3).with("s", "hey");
    let second = Context::new().with("n", 3).with("s", "hey");
    let before = second.clone();

    for _ in 0..3 {
        let a = evaluate_expression(&tree, &first).unwrap();
        let b = tree.resolve(&second).unwrap();
        assert_eq!(a, Value::from("HEY!"));
        assert_eq!(a, b);
    }
    assert_eq!(first, before);
    assert_eq!(second, before);
}

#[test]
fn test_shared_engine() {
    let engine = Arc::new(ScriptEngine::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                engine
                    .eval(&format!("v{} := {} * 10", i, i))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..4 {
        assert_eq!(
            engine.get(&format!("v{}", i)),
            Some(Value::Integer(i * 10))
        );
    }
}

#[test]
fn test_run_script_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "// totals").unwrap();
    writeln!(file, "price := 2.5;").unwrap();
    writeln!(file, "qty := 4;").unwrap();
    writeln!(file, "total := price * qty;").unwrap();
    file.flush().unwrap();

    let engine = ScriptEngine::new();
    run_script_file(&engine, file.path()).unwrap();
    assert_eq!(engine.get("total"), Some(Value::Number(10.0)));

    let missing = file.path().with_extension("missing");
    let err = run_script_file(&engine, &missing).unwrap_err();
    assert!(err.to_string().starts_with("Failed to read script"));
}
